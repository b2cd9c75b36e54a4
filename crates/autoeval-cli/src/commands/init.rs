//! The `autoeval init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("banks")?;
    let bank_path = std::path::Path::new("banks/example-bank.toml");
    if bank_path.exists() {
        println!("banks/example-bank.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created banks/example-bank.toml");
    }

    let answers_path = std::path::Path::new("answers-example.json");
    if answers_path.exists() {
        println!("answers-example.json already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_ANSWERS)?;
        println!("Created answers-example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: autoeval validate --path banks/example-bank.toml");
    println!(
        "  2. Run: autoeval compose --bank banks/example-bank.toml \
         --quota \"language=2,math=1\" --output template.toml"
    );
    println!(
        "  3. Run: autoeval grade --template template.toml \
         --answers answers-example.json"
    );

    Ok(())
}

const EXAMPLE_BANK: &str = r#"# autoeval question bank

[bank]
id = "ejemplo"
name = "Banco de ejemplo"
description = "Preguntas de autoevaluación de muestra"

[[questions]]
text = "¿El niño participa en las actividades de grupo?"
type = "yes_no"
area = "language"
correct_answer = "sí"

[[questions]]
text = "Ordena la frase"
type = "word_order"
area = "language"
words = ["el", "gato", "duerme"]

[[questions]]
text = "¿Cuántas manzanas hay en la imagen?"
type = "multiple_choice"
area = "math"

[[questions.options]]
text = "dos"

[[questions.options]]
text = "tres"
is_correct = true

[[questions]]
text = "Valora su atención de 1 a 5"
type = "scale_1_5"
area = "math"
correct_answer = "5"

[[questions]]
text = "Describe cómo se relaciona con otros niños"
type = "free_text"
area = "language"
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "respondent_id": "vol-1",
  "answers": ["sí", "el | gato | duerme", "tres"]
}
"#;
