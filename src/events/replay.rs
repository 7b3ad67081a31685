use tracing::info;

use crate::events::dispatch::{DispatchReport, click, type_value};
use crate::model::page::Page;
use crate::parse::script_parser::Step;

/// Error type for script replay
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: selector {selector} matches nothing")]
    NoMatch { line: usize, selector: String },
    #[error("line {line}: {selector} is not a form field")]
    NotAField { line: usize, selector: String },
}

/// Replay scripted steps against the page, in order.
///
/// Stops at the first step whose selector cannot be resolved; handler
/// failures inside a step are only collected in its report.
pub fn replay(page: &mut Page, steps: &[Step]) -> Result<Vec<DispatchReport>, ReplayError> {
    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        let target = step
            .selector()
            .resolve(&page.dom)
            .ok_or_else(|| ReplayError::NoMatch {
                line: step.line(),
                selector: step.selector().to_string(),
            })?;
        let report = match step {
            Step::Click { .. } => click(page, target),
            Step::Input { value, .. } => {
                if !page.dom.node(target).tag.is_field() {
                    return Err(ReplayError::NotAField {
                        line: step.line(),
                        selector: step.selector().to_string(),
                    });
                }
                type_value(page, target, value)
            }
        };
        reports.push(report);
    }
    info!(steps = steps.len(), "script replayed");
    Ok(reports)
}
