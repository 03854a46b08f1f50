//! Inactivity classification for subscribed forums.
//!
//! The core loop: resolve each subscription into a forum kind, fetch its
//! newest posts through the API client, and record a result row for every
//! forum that is stale, empty, or failed to fetch. Active forums produce
//! no row.

use anyhow::{Context, Result};
use chrono::{DateTime, Months, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::reddit::{FetchError, RedditClient, Submission, Subscription};

/// Public site host used for the canonical URLs in the report.
const PUBLIC_BASE_URL: &str = "https://www.reddit.com";

/// Display-name prefix marking a personal-feed subscription.
const PERSONAL_FEED_PREFIX: &str = "u_";

/// How many subscriptions to pull for the authenticated user.
const SUBSCRIPTION_LIMIT: usize = 1000;

/// How many of a forum's newest posts to inspect.
const POST_SAMPLE_SIZE: u32 = 5;

/// A subscribed forum, resolved once from its subscription display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forum {
    /// A community subreddit, reported under an `r/` path.
    Subreddit { name: String },
    /// One user's own feed, subscribed under a `u_` prefix and reported
    /// under a `user/` path.
    PersonalFeed { user: String },
}

impl Forum {
    /// Resolve a subscription display name into a forum kind.
    #[must_use]
    pub fn parse(display_name: &str) -> Self {
        display_name.strip_prefix(PERSONAL_FEED_PREFIX).map_or_else(
            || Self::Subreddit {
                name: display_name.to_string(),
            },
            |user| Self::PersonalFeed {
                user: user.to_string(),
            },
        )
    }

    /// Canonical browser URL for the forum.
    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Subreddit { name } => format!("{PUBLIC_BASE_URL}/r/{name}/"),
            Self::PersonalFeed { user } => format!("{PUBLIC_BASE_URL}/user/{user}/"),
        }
    }

    /// API listing path for the forum's newest submissions.
    #[must_use]
    pub fn listing_path(&self) -> String {
        match self {
            Self::Subreddit { name } => format!("r/{name}/new"),
            Self::PersonalFeed { user } => format!("user/{user}/submitted"),
        }
    }
}

/// Outcome of classifying one forum against the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Newest post is at or after the cutoff; omitted from the report.
    Active,
    /// No post newer than the cutoff; `last_post` is `None` for a forum
    /// with no posts at all.
    Inactive { last_post: Option<NaiveDate> },
}

/// Result row for one reported forum.
#[derive(Debug)]
pub struct ForumResult {
    pub display_name: String,
    pub url: String,
    pub last_post: Option<NaiveDate>,
    pub error: Option<FetchError>,
}

/// Walks the subscription list and classifies each forum against the
/// cutoff.
pub struct InactivityChecker {
    client: RedditClient,
    cutoff: DateTime<Utc>,
    subscriptions: Vec<Subscription>,
}

impl InactivityChecker {
    /// Compute the cutoff and fetch the subscription list.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is out of range or the
    /// subscription listing cannot be fetched. Both are fatal; per-forum
    /// failures are handled later by [`Self::classify_all`].
    pub async fn initialize(client: RedditClient, threshold_months: u32) -> Result<Self> {
        let cutoff = cutoff_from_now(threshold_months).with_context(|| {
            format!("Inactivity threshold of {threshold_months} months is out of range")
        })?;

        let subscriptions = client
            .subscribed_forums(SUBSCRIPTION_LIMIT)
            .await
            .context("Failed to list subscribed forums")?;

        info!(
            count = subscriptions.len(),
            cutoff = %cutoff.date_naive(),
            "Subscriptions loaded"
        );

        Ok(Self {
            client,
            cutoff,
            subscriptions,
        })
    }

    /// Classify every subscription, one forum at a time, in listing order.
    ///
    /// Fetch failures are recorded in the failing forum's row and never
    /// abort the pass.
    pub async fn classify_all(&self) -> Vec<ForumResult> {
        let mut results = Vec::new();

        for subscription in &self.subscriptions {
            // Resolve the forum and its URL before the fallible fetch so an
            // error row always carries its own forum's URL.
            let forum = Forum::parse(&subscription.display_name);
            let url = forum.url();

            match self
                .client
                .newest_posts(&forum.listing_path(), POST_SAMPLE_SIZE)
                .await
            {
                Ok(posts) => match classify(newest_timestamp(&posts), self.cutoff) {
                    Classification::Active => {
                        debug!(forum = %subscription.display_name, "Active, skipping");
                    }
                    Classification::Inactive { last_post } => {
                        results.push(ForumResult {
                            display_name: subscription.display_name.clone(),
                            url,
                            last_post,
                            error: None,
                        });
                    }
                },
                Err(e) => {
                    warn!(forum = %subscription.display_name, "Failed to fetch posts: {e}");
                    results.push(ForumResult {
                        display_name: subscription.display_name.clone(),
                        url,
                        last_post: None,
                        error: Some(e),
                    });
                }
            }
        }

        results
    }
}

/// Cutoff for the given threshold: now (UTC) minus that many calendar
/// months.
#[must_use]
pub fn cutoff_from_now(threshold_months: u32) -> Option<DateTime<Utc>> {
    Utc::now().checked_sub_months(Months::new(threshold_months))
}

/// Newest creation time among the fetched posts.
#[must_use]
pub fn newest_timestamp(posts: &[Submission]) -> Option<DateTime<Utc>> {
    let mut stamps: Vec<DateTime<Utc>> = posts
        .iter()
        .filter_map(|post| DateTime::from_timestamp(post.created_utc as i64, 0))
        .collect();
    stamps.sort_unstable();
    stamps.last().copied()
}

/// Classify a forum from its newest post timestamp.
#[must_use]
pub fn classify(newest: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> Classification {
    match newest {
        Some(ts) if ts >= cutoff => Classification::Active,
        Some(ts) => Classification::Inactive {
            last_post: Some(ts.date_naive()),
        },
        None => Classification::Inactive { last_post: None },
    }
}
