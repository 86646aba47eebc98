//! The UploadAnalyzer state machine.
//!
//! Four observable states, always re-enterable:
//!
//! ```text
//! Empty → Previewing → Analyzing → Resulted
//!   ↑         ↑  ↓ (failure)          ↓
//!   └──── Remove ←────────────────────┘
//! ```
//!
//! The machine owns the staged file and the last result; the GUI derives
//! every visual (which panel is shown, whether Analyze is enabled, the busy
//! spinner) purely from it and applies that as an idempotent render step.
//! Invariants held here rather than by convention:
//!
//! - at most one [`SelectedFile`] and one [`AnalysisResult`] at a time
//! - analysis can only begin when a file is staged and none is in flight
//! - the busy state is cleared on every completion path, success or not

use crate::intake::SelectedFile;
use crate::preview::PreviewImage;
use crate::verdict::AnalysisResult;

/// The four observable phases of the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No file staged; the intake zone is shown
    Empty,
    /// A file is staged and previewed; Analyze is available
    Previewing,
    /// A request is in flight; Analyze is disabled and the spinner shows
    Analyzing,
    /// A verdict is displayed alongside the preview
    Resulted,
}

/// The component instance: staged file, preview, phase and last verdict.
#[derive(Debug, Default)]
pub struct UploadAnalyzer {
    selected: Option<(SelectedFile, PreviewImage)>,
    result: Option<AnalysisResult>,
    analyzing: bool,
}

impl UploadAnalyzer {
    /// A fresh component in the Empty phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, derived from the owned state.
    pub fn phase(&self) -> Phase {
        if self.analyzing {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::Resulted
        } else if self.selected.is_some() {
            Phase::Previewing
        } else {
            Phase::Empty
        }
    }

    /// Stage a file with its decoded preview, replacing any prior selection.
    ///
    /// Clears any prior result, per the intake contract. Returns whether the
    /// selection was accepted: it is refused while a request is in flight so
    /// the staged file cannot change under it, and a caller must not render
    /// a refused file.
    #[must_use]
    pub fn select(&mut self, file: SelectedFile, preview: PreviewImage) -> bool {
        if self.analyzing {
            return false;
        }
        self.selected = Some((file, preview));
        self.result = None;
        true
    }

    /// The staged file, if any.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref().map(|(file, _)| file)
    }

    /// The decoded preview for the staged file, if any.
    pub fn preview(&self) -> Option<&PreviewImage> {
        self.selected.as_ref().map(|(_, preview)| preview)
    }

    /// The last verdict, if one is being displayed.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Whether the Analyze action is currently enactable.
    pub fn can_analyze(&self) -> bool {
        self.selected.is_some() && !self.analyzing
    }

    /// Enter the Analyzing phase, returning the file to submit.
    ///
    /// Hides any prior result. Unlike the advisory disable-while-busy of the
    /// original, this refuses outright (returns `None`) when no file is
    /// staged or a request is already in flight, so overlapping submissions
    /// cannot happen even if a caller ignores
    /// [`can_analyze`](Self::can_analyze).
    #[must_use]
    pub fn begin_analysis(&mut self) -> Option<SelectedFile> {
        if !self.can_analyze() {
            return None;
        }
        let (file, _) = self.selected.as_ref()?;
        let file = file.clone();
        self.analyzing = true;
        self.result = None;
        Some(file)
    }

    /// Record a verdict, clearing the busy state.
    ///
    /// A verdict arriving when nothing is in flight (stale channel message
    /// after a Remove) is dropped.
    pub fn finish_analysis(&mut self, result: AnalysisResult) {
        if !self.analyzing {
            return;
        }
        self.analyzing = false;
        if self.selected.is_some() {
            self.result = Some(result);
        }
    }

    /// Record a failed submission, clearing the busy state.
    ///
    /// The staged file and its preview are left untouched; the component
    /// returns to Previewing so the user can retry.
    pub fn fail_analysis(&mut self) {
        self.analyzing = false;
    }

    /// Remove the staged file and return to the Empty phase.
    ///
    /// Drops the selection, the preview and any displayed result. An
    /// in-flight request keeps running but its eventual outcome will be
    /// dropped by [`finish_analysis`](Self::finish_analysis).
    pub fn remove(&mut self) {
        self.selected = None;
        self.result = None;
        self.analyzing = false;
    }
}
