use console::style;

use crate::cli::OutputFormat;
use crate::relay::TranscriptResult;
use crate::Result;
use crate::utils::word_count;

/// Render a result in the requested format
pub fn render(result: &TranscriptResult, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(result),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
    };

    Ok(content)
}

/// Print transcription result to console
pub fn print_to_console(result: &TranscriptResult, format: &OutputFormat) -> Result<()> {
    println!("{}", render(result, format)?);
    Ok(())
}

fn format_as_text(result: &TranscriptResult) -> String {
    format!(
        "{} {}  {} {}  {} {}  {} {}\n\n{}",
        style("Duration:").bold(),
        result.duration,
        style("Language:").bold(),
        result.language,
        style("Confidence:").bold(),
        result.confidence,
        style("Words:").bold(),
        word_count(&result.text),
        result.text
    )
}
