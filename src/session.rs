use serde::Serialize;

use crate::context::Report;
use crate::types::PassengerProfile;

pub const PROMPT: &str =
    "Please fill out the survey form and click Predict to see the satisfaction prediction.";

/// Remembers the last submission and whether it still matches the form.
#[derive(Debug, Default)]
pub struct FormSession {
    last: Option<Report>,
    current: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionView {
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, report: Report) {
        self.last = Some(report);
        self.current = true;
    }

    /// Compare the live form state with the last submitted profile; any
    /// difference clears the displayed result until the next submit, even if
    /// the form is later edited back.
    pub fn observe(&mut self, form: &PassengerProfile) -> bool {
        let same = self.last.as_ref().map_or(false, |r| r.profile == *form);
        if self.current && !same {
            tracing::debug!("form changed since last submit; clearing result");
        }
        self.current = self.current && same;
        self.current
    }

    pub fn result(&self) -> Option<&Report> {
        if self.current {
            self.last.as_ref()
        } else {
            None
        }
    }

    pub fn view(&self) -> SessionView {
        match self.result() {
            Some(r) => SessionView {
                submitted: true,
                report: Some(r.clone()),
                message: None,
            },
            None => SessionView {
                submitted: false,
                report: None,
                message: Some(PROMPT),
            },
        }
    }
}
