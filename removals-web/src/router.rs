use removals_booking::{ServiceType, Step};
use serde::{Deserialize, Serialize};
use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/booking/step1")]
    Step1,
    #[at("/booking/step2")]
    Step2,
    #[at("/booking/step3")]
    Step3,
    #[at("/booking/step4")]
    Step4,
    #[at("/booking/step5")]
    Step5,
    #[at("/booking/step6")]
    Step6,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    #[must_use]
    pub const fn from_step(step: Step) -> Self {
        match step {
            Step::Service => Self::Step1,
            Step::Details => Self::Step2,
            Step::Vehicle => Self::Step3,
            Step::Hours => Self::Step4,
            Step::Extras => Self::Step5,
            Step::Payment => Self::Step6,
        }
    }

    #[must_use]
    pub const fn to_step(&self) -> Option<Step> {
        match self {
            Self::Step1 => Some(Step::Service),
            Self::Step2 => Some(Step::Details),
            Self::Step3 => Some(Step::Vehicle),
            Self::Step4 => Some(Step::Hours),
            Self::Step5 => Some(Step::Extras),
            Self::Step6 => Some(Step::Payment),
            Self::Home | Self::NotFound => None,
        }
    }
}

/// The `?type=` query every step route carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepQuery {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl StepQuery {
    #[must_use]
    pub fn for_service(service: Option<ServiceType>) -> Self {
        Self {
            service: service.map(|s| s.as_str().to_string()),
        }
    }

    #[must_use]
    pub fn service_type(&self) -> Option<ServiceType> {
        ServiceType::from_query(self.service.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_routes_map_both_ways() {
        for step in Step::ALL {
            let route = Route::from_step(step);
            assert_eq!(route.to_step(), Some(step));
            assert_eq!(route.to_path(), step.path());
        }
        assert_eq!(Route::Home.to_step(), None);
        assert_eq!(Route::NotFound.to_step(), None);
    }

    #[test]
    fn query_reads_only_known_service_types() {
        let query = StepQuery::for_service(Some(ServiceType::Business));
        assert_eq!(query.service.as_deref(), Some("business"));
        assert_eq!(query.service_type(), Some(ServiceType::Business));
        let bogus = StepQuery {
            service: Some("warehouse".into()),
        };
        assert_eq!(bogus.service_type(), None);
    }
}
