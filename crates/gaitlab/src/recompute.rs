//! Last-request-wins recomputation.
//!
//! Every request takes a [`Ticket`] carrying a generation number. A run
//! checks its ticket between stages and abandons work once a newer request
//! exists; publishing re-checks under the slot lock, so a slow stale run
//! can never replace the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use gaitlab_hull::extract_concave_hull;
use gaitlab_leg::LegGeometry;
use gaitlab_workspace::sample_workspace;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::{finish, fit_gait, Analysis, AnalysisSettings};

/// Proof of one recomputation request.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    /// Generation number of this request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer request has been made.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// A published analysis and the request that produced it.
#[derive(Debug, Clone)]
pub struct Published {
    /// Generation of the producing request.
    pub generation: u64,
    /// The result.
    pub analysis: Arc<Analysis>,
}

/// Shared handle issuing tickets and holding the latest published result.
///
/// Clones share state, so a handle can be moved to worker threads.
#[derive(Debug, Clone, Default)]
pub struct Recomputer {
    latest: Arc<AtomicU64>,
    published: Arc<Mutex<Option<Published>>>,
}

impl Recomputer {
    /// New handle with nothing requested yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn request(&self) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Generation of the newest request.
    pub fn current_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Run the pipeline for `ticket` and publish the result.
    ///
    /// Returns `Ok(None)` when the ticket was superseded before the result
    /// could be published.
    pub fn run(
        &self,
        ticket: &Ticket,
        geometry: &LegGeometry,
        settings: &AnalysisSettings,
    ) -> Result<Option<Arc<Analysis>>> {
        settings.validate()?;

        if self.superseded(ticket, "sampling") {
            return Ok(None);
        }
        let cloud = sample_workspace(geometry, &settings.workspace)?;

        if self.superseded(ticket, "hull") {
            return Ok(None);
        }
        let hull = extract_concave_hull(&cloud.points, &settings.hull);

        if self.superseded(ticket, "gait") {
            return Ok(None);
        }
        let gait = fit_gait(&hull, &settings.gait);

        let analysis = Arc::new(finish(cloud, hull, gait));
        Ok(self
            .publish(ticket, Arc::clone(&analysis))
            .then_some(analysis))
    }

    /// Request and run in one step.
    pub fn recompute(
        &self,
        geometry: &LegGeometry,
        settings: &AnalysisSettings,
    ) -> Result<Option<Arc<Analysis>>> {
        let ticket = self.request();
        self.run(&ticket, geometry, settings)
    }

    /// Store `analysis` if `ticket` is still the newest request.
    pub fn publish(&self, ticket: &Ticket, analysis: Arc<Analysis>) -> bool {
        let mut slot = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        if !ticket.is_current() {
            debug!(generation = ticket.generation, "Discarding superseded result");
            return false;
        }
        if slot
            .as_ref()
            .is_some_and(|p| p.generation >= ticket.generation)
        {
            return false;
        }
        *slot = Some(Published {
            generation: ticket.generation,
            analysis,
        });
        true
    }

    /// The most recently published result.
    pub fn latest(&self) -> Option<Published> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn superseded(&self, ticket: &Ticket, stage: &'static str) -> bool {
        if ticket.is_current() {
            return false;
        }
        debug!(
            generation = ticket.generation,
            latest = self.current_generation(),
            stage,
            "Request superseded"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;
    use gaitlab_leg::{LegParams, Topology};
    use std::thread;

    fn leg() -> LegGeometry {
        LegGeometry::from_params(&LegParams::preset(Topology::FiveBarRear)).unwrap()
    }

    #[test]
    fn test_newer_request_supersedes_older() {
        let recomputer = Recomputer::new();
        let old = recomputer.request();
        let new = recomputer.request();
        assert!(!old.is_current());
        assert!(new.is_current());

        let settings = AnalysisSettings::with_resolution(15);
        assert!(recomputer.run(&old, &leg(), &settings).unwrap().is_none());
        assert!(recomputer.latest().is_none());

        assert!(recomputer.run(&new, &leg(), &settings).unwrap().is_some());
        assert_eq!(recomputer.latest().unwrap().generation, new.generation());
    }

    #[test]
    fn test_stale_result_never_overwrites_newer() {
        let recomputer = Recomputer::new();
        let slow = recomputer.request();
        let slow_result = Arc::new(analyze(&leg(), &AnalysisSettings::with_resolution(10)).unwrap());

        let fast = recomputer.request();
        let fast_result = Arc::new(analyze(&leg(), &AnalysisSettings::with_resolution(20)).unwrap());
        assert!(recomputer.publish(&fast, fast_result));

        // The older request finishes last and is dropped
        assert!(!recomputer.publish(&slow, slow_result));
        let latest = recomputer.latest().unwrap();
        assert_eq!(latest.generation, fast.generation());
        assert_eq!(latest.analysis.cloud.resolution, 20);
    }

    #[test]
    fn test_concurrent_requests_publish_the_last() {
        let recomputer = Recomputer::new();
        let geometry = leg();
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let recomputer = recomputer.clone();
                let geometry = geometry.clone();
                thread::spawn(move || {
                    let settings = AnalysisSettings::with_resolution(8 + 2 * i);
                    recomputer.recompute(&geometry, &settings).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let latest = recomputer.latest().unwrap();
        assert_eq!(latest.generation, recomputer.current_generation());
        assert_eq!(recomputer.current_generation(), 6);
    }

    #[test]
    fn test_invalid_settings_fail_before_work() {
        let recomputer = Recomputer::new();
        let ticket = recomputer.request();
        let settings = AnalysisSettings::with_resolution(0);
        assert!(recomputer.run(&ticket, &leg(), &settings).is_err());
    }
}
