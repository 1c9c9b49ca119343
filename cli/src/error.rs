use std::{error::Error, ops::Range};

use ariadne::{Config, IndexType, ReportKind};
use asn1_objects::{Diagnostic, Level};

use crate::loader::Assignment;

type Report = ariadne::Report<'static, (String, Range<usize>)>;

/// Give every label of a diagnostic a location within the source file, by
/// finding its fragment in the assignment that failed.  Labels whose
/// fragment can not be found cover the whole assignment.
pub fn locate(diag: Diagnostic, assignment: &Assignment) -> Diagnostic {
    let whole = assignment.offset..assignment.offset + assignment.text.len();

    let labels = diag
        .labels
        .into_iter()
        .map(|label| {
            let location = label
                .fragment
                .as_deref()
                .filter(|fragment| !fragment.is_empty())
                .and_then(|fragment| {
                    let start = assignment.offset + assignment.text.find(fragment)?;
                    Some(start..start + fragment.len())
                })
                .unwrap_or_else(|| whole.clone());
            label.loc(location)
        })
        .collect();

    Diagnostic { labels, ..diag }
}

/// Helper function to convert asn.1 compiler diagnostics to a prettier format.
pub fn to_error(diag: &Diagnostic, file_name: &str) -> Result<Report, Box<dyn Error>> {
    let kind = match diag.level {
        Level::Error => ReportKind::Error,
        Level::Warning => ReportKind::Warning,
    };

    let offset = diag
        .labels
        .first()
        .and_then(|l| l.location.clone())
        .map(|l| l.start);
    let Some(offset) = offset else {
        return Err("Unable to get source location from diagnostic".into());
    };

    let mut report = Report::build(kind, file_name.to_string(), offset)
        .with_code(&diag.error_code)
        .with_message(&diag.name)
        .with_config(Config::default().with_index_type(IndexType::Byte));

    let mut note: Option<String> = None;
    for label in &diag.labels {
        let Some(location) = &label.location else {
            note = Some(note.unwrap_or_default() + "\n" + &label.message);
            continue;
        };
        report.add_label(
            ariadne::Label::new((file_name.to_string(), location.clone()))
                .with_message(&label.message),
        )
    }

    if let Some(note) = note {
        report.set_note(note);
    }

    Ok(report.finish())
}
