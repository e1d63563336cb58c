//! Knowledge card assembly
//!
//! Every lookup failure is turned into placeholder text here and nowhere
//! else, so a card is always produced, however little was found.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::annotate::{WIKI_BASE_URL, annotate_with_base};
use crate::encyclopedia::{ImageSource, SummarySource};
use crate::languages;
use crate::models::{KnowledgeCard, Language, PlaceQuery};
use crate::resolver::{self, CandidateList, NO_CULTURE, NO_POLITICS};

/// Placeholder when the page exists but has no extract
pub const NO_SUMMARY: &str = "No summary available.";
/// Placeholder when the summary request itself failed
pub const SUMMARY_FAILED: &str = "Could not fetch summary.";

/// Education fragments must be longer than this many characters
const MIN_EDUCATION_FRAGMENT: usize = 20;

/// Builds knowledge cards from an encyclopedia
pub struct Explorer<E> {
    encyclopedia: E,
    wiki_base_url: String,
}

impl<E: SummarySource + ImageSource> Explorer<E> {
    pub fn new(encyclopedia: E) -> Self {
        Self {
            encyclopedia,
            wiki_base_url: WIKI_BASE_URL.to_string(),
        }
    }

    /// Point generated links at a different article base
    #[must_use]
    pub fn with_wiki_base_url(mut self, wiki_base_url: impl Into<String>) -> Self {
        self.wiki_base_url = wiki_base_url.into();
        self
    }

    /// Validate the name and explore it
    pub async fn explore_named(&self, name: &str, language: Language) -> crate::Result<KnowledgeCard> {
        let query = PlaceQuery::new(name, language)?;
        Ok(self.explore(&query).await)
    }

    /// Gather every section for a place. Lookups run one after another.
    #[instrument(skip(self, query), fields(place = %query.name, language = %query.language))]
    pub async fn explore(&self, query: &PlaceQuery) -> KnowledgeCard {
        info!("Exploring {}", query.name);
        let place = query.name.as_str();

        let image_url = match self.encyclopedia.fetch_thumbnail(place).await {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("No image for {}: {}", place, e);
                None
            }
        };

        let (summary, famous_for) = match self.encyclopedia.fetch_summary(place).await {
            Ok(text) => (text.clone(), text),
            Err(e) if e.is_network() => {
                warn!("Summary lookup for {} failed: {}", place, e);
                (SUMMARY_FAILED.to_string(), NO_SUMMARY.to_string())
            }
            Err(e) => {
                debug!("No summary for {}: {}", place, e);
                (NO_SUMMARY.to_string(), NO_SUMMARY.to_string())
            }
        };

        let tourist_attractions = resolver::resolve(&self.encyclopedia, &CandidateList::tourism(place))
            .await
            .text()
            .map(|text| annotate_with_base(text, &self.wiki_base_url));

        let culture = resolver::resolve(&self.encyclopedia, &CandidateList::culture(place))
            .await
            .or_sentinel(NO_CULTURE);

        let education = resolver::resolve(&self.encyclopedia, &CandidateList::education(place))
            .await
            .text()
            .map(education_points)
            .unwrap_or_default();

        let politics = resolver::resolve(&self.encyclopedia, &CandidateList::politics(place))
            .await
            .or_sentinel(NO_POLITICS);

        let card = KnowledgeCard {
            place: query.name.clone(),
            title: query.title(),
            language: query.language,
            image_url,
            summary: query.language.tag(&summary),
            famous_for,
            tourist_attractions,
            culture,
            education,
            politics,
            languages: languages::detect(place),
            generated_at: Utc::now(),
        };

        info!(
            "Knowledge card for {} ready ({} education points, image: {})",
            card.title,
            card.education.len(),
            card.image_url.is_some()
        );

        card
    }
}

/// Split text on full stops and keep the trimmed fragments that are long
/// enough to say something
#[must_use]
pub fn education_points(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_EDUCATION_FRAGMENT)
        .map(str::to_string)
        .collect()
}
