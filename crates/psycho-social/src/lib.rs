//! # Psycho-Social
//!
//! Social layer of the population simulation: group dynamics computed from
//! member profiles (cohesion, influence networks, collective mood, change
//! dynamics) and signal extraction from public social feeds.

pub mod dynamics;
pub mod signals;

pub use dynamics::{
    ChangeDynamics, CollectiveMood, DynamicsConfig, GroupType, InfluenceNetwork, SocialDynamics,
    SocialDynamicsAggregator, SocialPhenomena,
};
pub use signals::{
    EngagementProfile, FeedAnalysis, FeedPost, SocialMediaInfluence, SocialSignalAnalyzer,
};
