//! Scripted walks through the booking wizard.
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use removals_booking::{BookingEngine, Catalog, MemoryStore, WizardConfig};

mod flows;

#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub seed: u64,
    /// Calendar date the wizard treats as today.
    pub today: NaiveDate,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// A fresh engine over empty in-memory storage.
    pub fn engine(&self) -> Result<BookingEngine<MemoryStore>> {
        Ok(BookingEngine::new(
            MemoryStore::new(),
            Catalog::load_from_static()?,
            WizardConfig::load_from_static()?,
        ))
    }

    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed)
    }

    pub fn note(&self, message: &str) {
        if self.verbose {
            println!("     · {message}");
        }
        log::debug!("[seed {}] {message}", self.seed);
    }
}

#[async_trait(?Send)]
pub trait Scenario {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn run(&self, ctx: &ScenarioCtx) -> Result<()>;
}

/// Every built-in scenario, in run order.
pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(flows::HappyPath),
        Box::new(flows::GuardRedirects),
        Box::new(flows::ExpiredCard),
        Box::new(flows::TermsRequired),
        Box::new(flows::RouteLookupFlow),
    ]
}

pub fn get_scenario(name: &str) -> Option<Box<dyn Scenario>> {
    all_scenarios().into_iter().find(|s| s.name() == name)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .iter()
        .map(|s| (s.name(), s.description()))
        .collect()
}
