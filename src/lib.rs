//! Airline passenger satisfaction predictor.
//!
//! A survey profile is expanded into the classifier's feature row to predict
//! a satisfaction category, and compared against a reference population to
//! show how common the passenger's attributes are.

pub mod cohort;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod form;
pub mod model;
pub mod predictor;
pub mod server;
pub mod session;
pub mod types;

pub use cohort::{compare, AgeGroup, CohortPercentage, PopulationRecord, PopulationTable, TrackedAttribute};
pub use context::{AppContext, Report};
pub use error::{Result, SatisfactionError};
pub use features::FeatureRow;
pub use model::{Classifier, DecisionTree, Model};
pub use predictor::predict;
pub use types::{
    CustomerType, PassengerProfile, PredictionResult, Rating, ServiceRatings, TravelClass, TypeOfTravel,
};
