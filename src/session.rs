use log::{error, info};
use tokio::sync::watch;

use crate::analyzer::NutritionAnalyzer;
use crate::model::{AnalysisRequest, AnalysisResult};

/// Holds the latest analysis (or error) for one user.
///
/// `submit` takes `&mut self`, so a second submission cannot start while one
/// is in flight. Other tasks follow the busy state through
/// [`AnalysisSession::subscribe_busy`].
pub struct AnalysisSession {
    analyzer: NutritionAnalyzer,
    busy: watch::Sender<bool>,
    current: Option<AnalysisResult>,
    error: Option<String>,
}

/// Clears the busy flag when dropped, including when the submitting future
/// is dropped mid-request.
struct BusyGuard<'a>(&'a watch::Sender<bool>);

impl<'a> BusyGuard<'a> {
    fn engage(busy: &'a watch::Sender<bool>) -> Self {
        busy.send_replace(true);
        BusyGuard(busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

impl AnalysisSession {
    pub fn new(analyzer: NutritionAnalyzer) -> Self {
        let (busy, _) = watch::channel(false);
        AnalysisSession {
            analyzer,
            busy,
            current: None,
            error: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Receiver that flips to `true` while a submission is in flight
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// The result of the last successful submission
    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    /// User-facing message from the last failed submission
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run one analysis, replacing the previous result or error.
    ///
    /// Returns the new result on success. On failure the error message is
    /// stored and returned.
    pub async fn submit(&mut self, request: &AnalysisRequest) -> Result<&AnalysisResult, &str> {
        self.current = None;
        self.error = None;

        let outcome = {
            let _busy = BusyGuard::engage(&self.busy);
            self.analyzer.analyze_request(request).await
        };

        match outcome {
            Ok(result) => {
                info!("Analysis complete: {:?}", result.dish_name());
                Ok(&*self.current.insert(result))
            }
            Err(e) => {
                error!("Error during analysis: {}", e);
                Err(self.error.insert(e.to_string()).as_str())
            }
        }
    }
}
