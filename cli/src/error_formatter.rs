use ariadne::{Color, Label, Report, ReportKind, Source};
use footprint::FootprintError;

/// Format a FootprintError with fancy terminal output using Ariadne
pub fn format_error(error: &FootprintError) -> String {
    match error {
        FootprintError::Registry(details)
        | FootprintError::Situation(details)
        | FootprintError::Catalogue(details) => {
            let mut output = Vec::new();

            let error_type = match error {
                FootprintError::Registry(_) => "Registry error",
                FootprintError::Situation(_) => "Situation error",
                _ => "Catalogue error",
            };

            let enhanced_message = format!(
                "{}: {} (file {}:{}:{})",
                error_type, details.message, details.source_id, details.span.line, details.span.col
            );

            // Ariadne spans count characters, not bytes
            let byte_offset = details.offset();
            let offset = details
                .source_text
                .char_indices()
                .take_while(|(index, _)| *index < byte_offset)
                .count();
            let end = (offset + 1).min(details.source_text.chars().count());
            let report = Report::build(ReportKind::Error, &details.source_id, offset)
                .with_message(enhanced_message)
                .with_label(
                    Label::new((&details.source_id, offset..end))
                        .with_message(&details.message)
                        .with_color(Color::Red),
                );

            match report.finish().write(
                (
                    &details.source_id,
                    Source::from(details.source_text.as_ref()),
                ),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => {
                    // Fallback to simple format
                    format!("{}", error)
                }
            }
        }
        FootprintError::CircularReference(msg) => format!("Circular reference: {}", msg),
        FootprintError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
    }
}
