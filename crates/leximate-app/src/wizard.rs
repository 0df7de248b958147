//! The four-step document wizard.
//!
//! Steps run `Type → Basics → Terms → Review` with no skipping. Only the
//! first transition is guarded: a document type must be chosen.

use leximate_core::DocumentType;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Type = 1,
    Basics = 2,
    Terms = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [Self::Type, Self::Basics, Self::Terms, Self::Review];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Type => "Document Type",
            Self::Basics => "Basic Information",
            Self::Terms => "Terms & Conditions",
            Self::Review => "Review & Generate",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Type => "Choose your document type",
            Self::Basics => "Enter party details",
            Self::Terms => "Define specific terms",
            Self::Review => "Preview and download",
        }
    }

    fn following(self) -> Option<Step> {
        match self {
            Self::Type => Some(Self::Basics),
            Self::Basics => Some(Self::Terms),
            Self::Terms => Some(Self::Review),
            Self::Review => None,
        }
    }

    fn preceding(self) -> Option<Step> {
        match self {
            Self::Type => None,
            Self::Basics => Some(Self::Type),
            Self::Terms => Some(Self::Basics),
            Self::Review => Some(Self::Terms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Please select a document type")]
    TypeNotSelected,
    #[error("already at the last step")]
    AlreadyAtLastStep,
}

/// Outcome of a successful `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved(Step),
    /// The wizard just arrived at [`Step::Review`].
    EnteredReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    step: Step,
}

impl Default for StepController {
    fn default() -> Self {
        Self::new()
    }
}

impl StepController {
    pub fn new() -> Self {
        Self { step: Step::Type }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn next(&mut self, document_type: Option<DocumentType>) -> Result<Transition, WizardError> {
        if self.step == Step::Type && document_type.is_none() {
            return Err(WizardError::TypeNotSelected);
        }
        let next = self.step.following().ok_or(WizardError::AlreadyAtLastStep)?;
        self.step = next;
        Ok(if next == Step::Review {
            Transition::EnteredReview
        } else {
            Transition::Moved(next)
        })
    }

    /// Step back one page. A no-op on the first step.
    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.step.preceding() {
            self.step = prev;
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_step_blocks_iff_type_unset() {
        let mut c = StepController::new();
        assert_eq!(c.next(None), Err(WizardError::TypeNotSelected));
        assert_eq!(c.step(), Step::Type);

        for ty in DocumentType::ALL {
            let mut c = StepController::new();
            assert_eq!(c.next(Some(ty)), Ok(Transition::Moved(Step::Basics)));
        }
    }

    #[test]
    fn later_steps_advance_unconditionally() {
        let mut c = StepController::new();
        c.next(Some(DocumentType::Nda)).unwrap();
        assert_eq!(c.next(None), Ok(Transition::Moved(Step::Terms)));
        assert_eq!(c.next(None), Ok(Transition::EnteredReview));
        assert_eq!(c.step(), Step::Review);
        assert_eq!(c.next(None), Err(WizardError::AlreadyAtLastStep));
    }

    #[test]
    fn back_walks_one_step_and_stops_at_first() {
        let mut c = StepController::new();
        assert_eq!(c.back(), Step::Type);
        c.next(Some(DocumentType::Contract)).unwrap();
        c.next(None).unwrap();
        assert_eq!(c.back(), Step::Basics);
        assert_eq!(c.back(), Step::Type);
        assert_eq!(c.back(), Step::Type);
    }

    #[test]
    fn titles_and_numbers() {
        let titles: Vec<_> = Step::ALL.iter().map(|s| (s.number(), s.title())).collect();
        assert_eq!(
            titles,
            vec![
                (1, "Document Type"),
                (2, "Basic Information"),
                (3, "Terms & Conditions"),
                (4, "Review & Generate"),
            ]
        );
        assert_eq!(Step::Review.description(), "Preview and download");
    }
}
