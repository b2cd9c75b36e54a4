//! The `autoeval compose` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use autoeval_core::composer::{compose_random, finalize, AreaQuota};
use autoeval_core::parser;

pub fn execute(
    bank_path: PathBuf,
    quota_str: String,
    title: String,
    seed: Option<u64>,
    output: PathBuf,
) -> Result<()> {
    let bank = parser::parse_bank_file(&bank_path)?;
    let quotas = parse_quotas(&quota_str)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let questions = compose_random(&bank.questions, &quotas, &mut rng)
        .with_context(|| format!("cannot compose from bank '{}'", bank.name))?;
    let template = finalize(&title, &bank.description, questions)?;

    parser::write_template_file(&template, &output)?;

    println!(
        "Composed '{}': {} questions, area {}",
        template.title,
        template.questions.len(),
        template.area,
    );
    for question in &template.questions {
        println!(
            "  {:>3} pts  [{}] {}",
            question.points, question.area, question.text
        );
    }
    println!("Wrote {}", output.display());

    Ok(())
}

/// Parse "language=3,math=2" into area quotas, keeping the given order.
fn parse_quotas(input: &str) -> Result<Vec<AreaQuota>> {
    let mut quotas = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (area, count) = part
            .split_once('=')
            .with_context(|| format!("invalid quota '{part}', expected area=count"))?;
        let count: usize = count
            .trim()
            .parse()
            .with_context(|| format!("invalid count in quota '{part}'"))?;
        quotas.push(AreaQuota {
            area: area.trim().to_string(),
            count,
        });
    }
    anyhow::ensure!(!quotas.is_empty(), "no quotas given");
    Ok(quotas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quota_list() {
        let quotas = parse_quotas("language=3, math=2").unwrap();
        assert_eq!(quotas.len(), 2);
        assert_eq!(quotas[0].area, "language");
        assert_eq!(quotas[0].count, 3);
        assert_eq!(quotas[1].area, "math");
        assert_eq!(quotas[1].count, 2);
    }

    #[test]
    fn parse_quota_rejects_garbage() {
        assert!(parse_quotas("language").is_err());
        assert!(parse_quotas("language=three").is_err());
        assert!(parse_quotas("").is_err());
    }
}
