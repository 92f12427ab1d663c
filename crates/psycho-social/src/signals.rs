//! Social feed signal extraction.
//!
//! Keyword and engagement heuristics over short public posts: sentiment,
//! topics, emotions, influential authors and collective psychological
//! indicators, plus per-profile engagement tendencies and a population-level
//! influence forecast.

use psycho_core::stats::{bounded, mean, population_std, signed};
use psycho_core::PsychologicalProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const POSITIVE_WORDS: &[&str] = &[
    "great", "amazing", "wonderful", "excellent", "fantastic", "love", "happy", "success",
    "breakthrough", "progress",
];
const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "horrible", "hate", "angry", "crisis", "disaster", "failure", "problem",
    "concern",
];
const TOPICS: &[&str] = &[
    "politics",
    "economy",
    "technology",
    "science",
    "culture",
    "military",
    "trade",
];
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "this", "that",
    "from", "have", "will", "just", "about",
];

const ANXIETY_WORDS: &[&str] = &["worried", "concerned", "anxious", "fear", "uncertain", "crisis"];
const OPTIMISM_WORDS: &[&str] = &["hope", "optimistic", "bright", "future", "progress", "success"];
const TRUST_WORDS: &[&str] = &["trust", "reliable", "honest", "integrity", "transparent"];
const POLITICAL_WORDS: &[&str] =
    &["government", "policy", "election", "vote", "politics", "leader"];
const ECONOMIC_WORDS: &[&str] =
    &["economy", "trade", "business", "market", "financial", "prosperity"];

pub const INFLUENTIAL_VOICES: usize = 5;
pub const EMERGING_TOPICS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Joy,
    Anger,
    Fear,
    Sadness,
    Surprise,
    Trust,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Trust,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["happy", "excited", "thrilled", "delighted", "joyful", "celebration"],
            Emotion::Anger => &["angry", "furious", "outraged", "frustrated", "mad", "irritated"],
            Emotion::Fear => &["scared", "afraid", "terrified", "worried", "anxious", "nervous"],
            Emotion::Sadness => &[
                "sad",
                "depressed",
                "disappointed",
                "heartbroken",
                "grief",
                "sorrow",
            ],
            Emotion::Surprise => &[
                "surprised",
                "shocked",
                "amazed",
                "astonished",
                "unexpected",
                "wow",
            ],
            Emotion::Trust => &["trust", "confident", "reliable", "secure", "faith", "believe"],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMetrics {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

impl PostMetrics {
    /// Weighted interaction count. Summed in floating point so that large
    /// counts cannot overflow.
    fn weighted(&self, like: f64, share: f64, comment: f64) -> f64 {
        like * self.likes as f64 + share * self.shares as f64 + comment * self.comments as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Owning civilization, used by the feed filter
    #[serde(default)]
    pub civilization: Option<String>,
    #[serde(default)]
    pub metrics: PostMetrics,
}

impl FeedPost {
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            content: content.into(),
            category: None,
            civilization: None,
            metrics: PostMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, likes: u64, shares: u64, comments: u64) -> Self {
        self.metrics = PostMetrics {
            likes,
            shares,
            comments,
        };
        self
    }

    fn engagement(&self) -> f64 {
        self.metrics.weighted(1.0, 2.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalIndicators {
    pub collective_anxiety: f64,
    pub optimism: f64,
    pub social_trust: f64,
    pub political_engagement: f64,
    pub economic_confidence: f64,
}

impl Default for PsychologicalIndicators {
    fn default() -> Self {
        Self {
            collective_anxiety: 50.0,
            optimism: 50.0,
            social_trust: 50.0,
            political_engagement: 50.0,
            economic_confidence: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedAnalysis {
    pub post_count: usize,
    pub overall_sentiment: f64,
    pub topic_sentiments: BTreeMap<String, f64>,
    pub emotional_trends: BTreeMap<Emotion, f64>,
    pub social_cohesion: f64,
    pub influential_voices: Vec<String>,
    pub emerging_topics: Vec<String>,
    pub indicators: PsychologicalIndicators,
}

impl Default for FeedAnalysis {
    /// Neutral reading used when there is nothing to analyze
    fn default() -> Self {
        Self {
            post_count: 0,
            overall_sentiment: 50.0,
            topic_sentiments: BTreeMap::new(),
            emotional_trends: BTreeMap::new(),
            social_cohesion: 50.0,
            influential_voices: Vec::new(),
            emerging_topics: Vec::new(),
            indicators: PsychologicalIndicators::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementProfile {
    pub engagement_probability: f64,
    pub content_preferences: Vec<String>,
    pub share_rate: f64,
    pub preferred_share_types: Vec<String>,
    pub virality_contribution: f64,
    pub influenceability: f64,
    pub content_creation_potential: f64,
    pub addiction_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaInfluence {
    pub behavior_shifts: BTreeMap<String, f64>,
    pub opinion_polarization: f64,
    /// Signed shift of collective mood away from neutral
    pub collective_mood_change: f64,
    pub social_movement_potential: f64,
    pub misinformation_vulnerability: f64,
    pub cultural_trend_adoption: BTreeMap<String, f64>,
}

/// Sentiment of one post, 0–100
pub fn post_sentiment(post: &FeedPost) -> f64 {
    let content = post.content.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| content.contains(*w)).count() as f64;
    let negative = NEGATIVE_WORDS.iter().filter(|w| content.contains(*w)).count() as f64;
    let engagement = (post.metrics.weighted(1.0, 2.0, 0.0) / 10.0).min(20.0);
    bounded(50.0 + 10.0 * positive - 10.0 * negative + engagement)
}

#[derive(Debug, Clone, Default)]
pub struct SocialSignalAnalyzer;

impl SocialSignalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a feed, optionally restricted to one civilization. An empty
    /// (or fully filtered) feed yields the neutral default.
    pub fn analyze_feed(&self, posts: &[FeedPost], civilization: Option<&str>) -> FeedAnalysis {
        let relevant: Vec<&FeedPost> = posts
            .iter()
            .filter(|p| civilization.map_or(true, |c| p.civilization.as_deref() == Some(c)))
            .collect();
        if relevant.is_empty() {
            return FeedAnalysis::default();
        }

        let lowered: Vec<String> = relevant.iter().map(|p| p.content.to_lowercase()).collect();
        let sentiments: Vec<f64> = relevant.iter().map(|p| post_sentiment(p)).collect();
        let n = relevant.len() as f64;

        let mut topic_sentiments = BTreeMap::new();
        for topic in TOPICS {
            let scores: Vec<f64> = relevant
                .iter()
                .zip(&lowered)
                .zip(&sentiments)
                .filter(|((post, content), _)| {
                    content.contains(topic) || post.category.as_deref() == Some(*topic)
                })
                .map(|(_, s)| *s)
                .collect();
            if !scores.is_empty() {
                topic_sentiments.insert(topic.to_string(), mean(&scores));
            }
        }

        let emotional_trends = Emotion::ALL
            .into_iter()
            .map(|e| (e, keyword_rate(&lowered, e.keywords())))
            .collect();

        let interactions: f64 = relevant
            .iter()
            .map(|p| p.metrics.weighted(1.0, 1.0, 1.0))
            .sum();

        let analysis = FeedAnalysis {
            post_count: relevant.len(),
            overall_sentiment: mean(&sentiments),
            topic_sentiments,
            emotional_trends,
            social_cohesion: bounded(2.0 * interactions / n),
            influential_voices: influential_voices(&relevant),
            emerging_topics: emerging_topics(&lowered, EMERGING_TOPICS),
            indicators: PsychologicalIndicators {
                collective_anxiety: keyword_rate(&lowered, ANXIETY_WORDS),
                optimism: keyword_rate(&lowered, OPTIMISM_WORDS),
                social_trust: keyword_rate(&lowered, TRUST_WORDS),
                political_engagement: keyword_rate(&lowered, POLITICAL_WORDS),
                economic_confidence: keyword_rate(&lowered, ECONOMIC_WORDS),
            },
        };
        tracing::debug!(
            "Analyzed {} posts (sentiment {:.1})",
            analysis.post_count,
            analysis.overall_sentiment
        );
        analysis
    }

    pub fn engagement_profile(&self, profile: &PsychologicalProfile) -> EngagementProfile {
        let p = &profile.personality;
        let r = &profile.risk_profile;
        let impulsivity = (r.decision_speed + (100.0 - r.information_seeking)) / 2.0;

        let mut content_preferences = Vec::new();
        let mut preferred_share_types = Vec::new();
        if p.openness > 60.0 {
            content_preferences.extend(["science", "technology", "culture"]);
            preferred_share_types.extend(["interesting_articles", "creative_content"]);
        }
        if p.conscientiousness > 60.0 {
            content_preferences.extend(["news", "politics", "education"]);
            preferred_share_types.extend(["educational_content", "important_news"]);
        }
        if p.extraversion > 60.0 {
            content_preferences.extend(["social", "entertainment", "events"]);
            preferred_share_types.extend(["personal_updates", "social_events"]);
        }
        if p.agreeableness > 60.0 {
            content_preferences.extend(["community", "charity", "cooperation"]);
            preferred_share_types.extend(["positive_messages", "community_support"]);
        }
        if p.neuroticism > 60.0 {
            content_preferences.extend(["health", "safety", "support"]);
        }

        EngagementProfile {
            engagement_probability: bounded(
                0.3 * p.extraversion
                    + 0.25 * p.openness
                    + 0.2 * p.agreeableness
                    + 0.15 * (100.0 - p.neuroticism)
                    + 0.1 * p.conscientiousness,
            ),
            content_preferences: content_preferences.into_iter().map(String::from).collect(),
            share_rate: bounded(p.extraversion * p.agreeableness / 100.0),
            preferred_share_types: preferred_share_types.into_iter().map(String::from).collect(),
            virality_contribution: bounded(p.extraversion * p.openness / 100.0),
            influenceability: influenceability(profile),
            content_creation_potential: bounded(
                0.35 * p.openness
                    + 0.3 * p.extraversion
                    + 0.2 * p.conscientiousness
                    + 0.15 * (100.0 - p.neuroticism),
            ),
            addiction_risk: bounded(
                0.3 * p.neuroticism
                    + 0.25 * (100.0 - p.conscientiousness)
                    + 0.2 * p.extraversion
                    + 0.25 * impulsivity,
            ),
        }
    }

    /// Forecast how a feed shifts a population. An empty population has no
    /// susceptibility and therefore no mood change.
    pub fn predict_social_media_influence(
        &self,
        posts: &[FeedPost],
        profiles: &[&PsychologicalProfile],
    ) -> SocialMediaInfluence {
        let feed = self.analyze_feed(posts, None);
        let susceptibility =
            mean(&profiles.iter().map(|p| influenceability(p)).collect::<Vec<_>>());
        let openness = mean(&profiles.iter().map(|p| p.personality.openness).collect::<Vec<_>>());
        let extraversion =
            mean(&profiles.iter().map(|p| p.personality.extraversion).collect::<Vec<_>>());

        let ind = &feed.indicators;
        let mut behavior_shifts = BTreeMap::new();
        behavior_shifts.insert("consumption_patterns".to_string(), ind.economic_confidence * 0.8);
        behavior_shifts.insert(
            "political_participation".to_string(),
            ind.political_engagement * 0.9,
        );
        behavior_shifts.insert("social_cooperation".to_string(), feed.social_cohesion * 0.7);
        behavior_shifts.insert("risk_taking".to_string(), (100.0 - ind.collective_anxiety) * 0.6);
        behavior_shifts.insert("innovation_adoption".to_string(), ind.optimism * 0.8);

        let sentiments: Vec<f64> = posts.iter().map(post_sentiment).collect();
        let spread = population_std(&sentiments);

        let cultural_trend_adoption = if profiles.is_empty() {
            BTreeMap::new()
        } else {
            let adoption = bounded(0.6 * openness + 0.4 * extraversion);
            feed.emerging_topics
                .iter()
                .take(5)
                .map(|topic| (topic.clone(), adoption))
                .collect()
        };

        SocialMediaInfluence {
            behavior_shifts,
            opinion_polarization: bounded(2.0 * spread * spread),
            collective_mood_change: signed(
                (feed.overall_sentiment - 50.0) * susceptibility / 100.0,
            ),
            social_movement_potential: bounded(
                0.4 * ind.collective_anxiety
                    + 0.4 * ind.political_engagement
                    + 0.2 * feed.social_cohesion,
            ),
            misinformation_vulnerability: susceptibility,
            cultural_trend_adoption,
        }
    }
}

fn influenceability(profile: &PsychologicalProfile) -> f64 {
    let p = &profile.personality;
    bounded(
        0.3 * (100.0 - p.conscientiousness)
            + 0.25 * p.agreeableness
            + 0.25 * p.neuroticism
            + 0.2 * (100.0 - p.openness),
    )
}

/// Keyword hits per post, as a percentage capped at 100
fn keyword_rate(contents: &[String], keywords: &[&str]) -> f64 {
    if contents.is_empty() {
        return 0.0;
    }
    let hits: usize = contents
        .iter()
        .map(|c| keywords.iter().filter(|k| c.contains(*k)).count())
        .sum();
    bounded(hits as f64 / contents.len() as f64 * 100.0)
}

fn influential_voices(posts: &[&FeedPost]) -> Vec<String> {
    let mut by_author: BTreeMap<&str, f64> = BTreeMap::new();
    for post in posts {
        *by_author.entry(post.author_id.as_str()).or_default() += post.engagement();
    }
    let mut ranked: Vec<(&str, f64)> = by_author.into_iter().collect();
    // stable sort keeps authors with equal engagement in id order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(INFLUENTIAL_VOICES)
        .map(|(author, _)| author.to_string())
        .collect()
}

fn emerging_topics(contents: &[String], limit: usize) -> Vec<String> {
    let mut freq: BTreeMap<String, usize> = BTreeMap::new();
    for content in contents {
        for word in content.split_whitespace() {
            let clean: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if clean.chars().count() > 3 && !STOP_WORDS.contains(&clean.as_str()) {
                *freq.entry(clean).or_default() += 1;
            }
        }
    }
    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_core::{ProfileId, SimClock};
    use uuid::Uuid;

    fn profile(level: f64) -> PsychologicalProfile {
        PsychologicalProfile::baseline(ProfileId(Uuid::nil()), level, SimClock::default().now())
    }

    #[test]
    fn test_post_sentiment_keywords_and_engagement() {
        let post = FeedPost::new("1", "a", "Great progress on the bridge, but one problem remains");
        assert_eq!(post_sentiment(&post), 60.0);
        let viral = post.clone().with_metrics(1000, 1000, 0);
        assert_eq!(post_sentiment(&viral), 80.0);
    }

    #[test]
    fn test_huge_engagement_counts_saturate() {
        let post = FeedPost::new("1", "a", "Great news")
            .with_metrics(u64::MAX / 2 + 1, u64::MAX / 2, u64::MAX);
        assert_eq!(post_sentiment(&post), 80.0);

        let analysis = SocialSignalAnalyzer::new().analyze_feed(&[post.clone(), post], None);
        assert_eq!(analysis.overall_sentiment, 80.0);
        assert_eq!(analysis.social_cohesion, 100.0);
        assert_eq!(analysis.influential_voices.len(), 1);
    }

    #[test]
    fn test_empty_feed_is_neutral() {
        let analysis = SocialSignalAnalyzer::new().analyze_feed(&[], None);
        assert_eq!(analysis, FeedAnalysis::default());
        assert_eq!(analysis.overall_sentiment, 50.0);
    }

    #[test]
    fn test_civilization_filter() {
        let mut ours = FeedPost::new("1", "a", "Wonderful harvest festival");
        ours.civilization = Some("aurora".into());
        let theirs = FeedPost::new("2", "b", "Terrible storm");
        let analysis = SocialSignalAnalyzer::new().analyze_feed(&[ours, theirs], Some("aurora"));
        assert_eq!(analysis.post_count, 1);
        assert_eq!(analysis.overall_sentiment, 60.0);
        let none = SocialSignalAnalyzer::new().analyze_feed(&[], Some("aurora"));
        assert_eq!(none.post_count, 0);
    }

    #[test]
    fn test_topics_and_emotions() {
        let mut trade = FeedPost::new("1", "a", "Markets calm today");
        trade.category = Some("trade".into());
        let posts = vec![trade, FeedPost::new("2", "b", "The economy is a disaster, I am worried")];
        let analysis = SocialSignalAnalyzer::new().analyze_feed(&posts, None);
        assert_eq!(analysis.topic_sentiments.get("trade"), Some(&50.0));
        assert_eq!(analysis.topic_sentiments.get("economy"), Some(&40.0));
        assert!(!analysis.topic_sentiments.contains_key("science"));
        assert_eq!(analysis.emotional_trends[&Emotion::Fear], 50.0);
        assert_eq!(analysis.emotional_trends.len(), Emotion::ALL.len());
    }

    #[test]
    fn test_influential_voices_ranked_with_id_ties() {
        let posts = vec![
            FeedPost::new("1", "carol", "x").with_metrics(5, 0, 0),
            FeedPost::new("2", "alice", "x").with_metrics(5, 0, 0),
            FeedPost::new("3", "bob", "x").with_metrics(1, 10, 0),
        ];
        let analysis = SocialSignalAnalyzer::new().analyze_feed(&posts, None);
        assert_eq!(analysis.influential_voices, vec!["bob", "alice", "carol"]);
    }

    #[test]
    fn test_emerging_topics_frequency_then_alphabetical() {
        let posts = vec![
            FeedPost::new("1", "a", "Solar panels everywhere! solar"),
            FeedPost::new("2", "b", "with wind and panels"),
        ];
        let analysis = SocialSignalAnalyzer::new().analyze_feed(&posts, None);
        assert_eq!(analysis.emerging_topics, vec!["panels", "solar", "everywhere", "wind"]);
    }

    #[test]
    fn test_engagement_profile_bounded() {
        let analyzer = SocialSignalAnalyzer::new();
        for level in [0.0, 50.0, 100.0] {
            let e = analyzer.engagement_profile(&profile(level));
            for v in [
                e.engagement_probability,
                e.share_rate,
                e.virality_contribution,
                e.influenceability,
                e.content_creation_potential,
                e.addiction_risk,
            ] {
                assert!((0.0..=100.0).contains(&v));
            }
        }
        let outgoing = analyzer.engagement_profile(&profile(80.0));
        assert!(outgoing.content_preferences.contains(&"social".to_string()));
    }

    #[test]
    fn test_influence_forecast() {
        let analyzer = SocialSignalAnalyzer::new();
        let posts = vec![
            FeedPost::new("1", "a", "Amazing success, wonderful progress"),
            FeedPost::new("2", "b", "Awful crisis, terrible failure"),
        ];
        let people = [profile(50.0), profile(50.0)];
        let refs: Vec<&PsychologicalProfile> = people.iter().collect();
        let forecast = analyzer.predict_social_media_influence(&posts, &refs);
        assert!(forecast.opinion_polarization > 0.0);
        assert_eq!(forecast.misinformation_vulnerability, 50.0);
        assert_eq!(forecast.behavior_shifts.len(), 5);

        let nobody = analyzer.predict_social_media_influence(&posts, &[]);
        assert_eq!(nobody.collective_mood_change, 0.0);
        assert!(nobody.cultural_trend_adoption.is_empty());
    }
}
