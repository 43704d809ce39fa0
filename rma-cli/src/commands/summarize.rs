use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use rma_policy::summarizer;

/// Run the `rma summarize` command over a file or piped stdin.
pub fn run(focus: &str, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read policy text from stdin")?;
            buffer
        }
    };

    println!("{}", summarizer::render(&text, focus));
    Ok(())
}
