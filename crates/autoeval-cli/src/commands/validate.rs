//! The `autoeval validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use autoeval_core::parser;

pub fn execute(path: PathBuf) -> Result<()> {
    let mut total_warnings = 0;

    if path.is_dir() {
        let banks = parser::load_bank_directory(&path)?;
        for bank in &banks {
            total_warnings += report_bank(bank);
        }
        if banks.is_empty() {
            println!("No bank files found in {}", path.display());
        }
    } else {
        match sniff_kind(&path)? {
            FileKind::Bank => {
                let bank = parser::parse_bank_file(&path)?;
                total_warnings += report_bank(&bank);
            }
            FileKind::Template => {
                let template = parser::parse_template_file(&path)?;
                println!(
                    "Template: {} ({} questions, {} points, area {})",
                    template.title,
                    template.questions.len(),
                    template.total_points(),
                    template.area,
                );
            }
        }
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

enum FileKind {
    Bank,
    Template,
}

/// Decide whether a TOML file is a bank or a template by its top-level table.
fn sniff_kind(path: &Path) -> Result<FileKind> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: toml::Value = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", path.display()))?;

    if value.get("bank").is_some() {
        Ok(FileKind::Bank)
    } else if value.get("template").is_some() {
        Ok(FileKind::Template)
    } else {
        anyhow::bail!(
            "{} has neither a [bank] nor a [template] table",
            path.display()
        )
    }
}

fn report_bank(bank: &parser::QuestionBankFile) -> usize {
    println!("Bank: {} ({} questions)", bank.name, bank.questions.len());

    let warnings = parser::validate_bank(bank);
    for w in &warnings {
        let prefix = w
            .question
            .as_ref()
            .map(|q| format!("  [{q}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    warnings.len()
}
