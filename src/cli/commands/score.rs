//! Score command - Compute the feedback for a guess against a secret

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::output::print_kv,
    game::{Code, score},
};

#[derive(Parser, Debug)]
#[command(about = "Score a guess against a secret")]
pub struct ScoreArgs {
    /// Secret code, comma separated (e.g. 1,1,2)
    #[arg(long, short = 's')]
    pub secret: Code,

    /// Guess, comma separated (e.g. 1,2,1)
    #[arg(long, short = 'g')]
    pub guess: Code,
}

pub fn execute(args: ScoreArgs) -> Result<()> {
    if args.secret.len() != args.guess.len() {
        bail!(
            "secret {} and guess {} have different lengths",
            args.secret,
            args.guess
        );
    }
    if args.secret.pegs().contains(&0) || args.guess.pegs().contains(&0) {
        bail!("colours are numbered from 1");
    }

    let feedback = score(&args.guess, &args.secret);
    print_kv("Secret", &args.secret.to_string());
    print_kv("Guess", &args.guess.to_string());
    print_kv("Misplaced", &feedback.misplaced.to_string());
    print_kv("Exact", &feedback.exact.to_string());
    print_kv("Feedback", &feedback.to_string());
    Ok(())
}
