//! Routing and the view state of a browsing session.
//!
//! Fetches are asynchronous, so a slow response can arrive after the user has
//! already navigated elsewhere. Every navigation bumps a generation counter and
//! hands out a [`Ticket`]; results are only applied while their ticket is
//! still current.

use std::str::FromStr;

use crate::catalog::{Catalog, CatalogError};
use crate::model::{Category, Question, Subcategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category { slug: String, topic: Option<String> },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported path `{0}`, expected `/`, `/<category>` or `/<category>/<topic>`")]
pub struct RouteError(String);

impl Route {
    /// Parse `/`, `/<category>` or `/<category>/<topic>`. One leading and one
    /// trailing slash are optional; empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Ok(Route::Home);
        }
        let inner = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let inner = inner.strip_suffix('/').unwrap_or(inner);

        let parts: Vec<&str> = inner.split('/').collect();
        match parts.as_slice() {
            [slug] if !slug.is_empty() => Ok(Route::category(*slug)),
            [slug, topic] if !slug.is_empty() && !topic.is_empty() => Ok(Route::Category {
                slug: slug.to_string(),
                topic: Some(topic.to_string()),
            }),
            _ => Err(RouteError(path.to_string())),
        }
    }

    pub fn category(slug: impl Into<String>) -> Self {
        Route::Category {
            slug: slug.into(),
            topic: None,
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Route::parse(path)
    }
}

/// Proof that a fetch was issued for a particular navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
    pub selected: Option<Subcategory>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Home { categories: Vec<Category> },
    Category(CategoryPage),
    /// Blocking message shown instead of content
    Failed(String),
}

#[derive(Debug)]
pub struct BrowseState {
    generation: u64,
    route: Route,
    view: View,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            generation: 0,
            route: Route::Home,
            view: View::Loading,
        }
    }
}

impl BrowseState {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn into_view(self) -> View {
        self.view
    }

    /// Start a navigation. Anything still in flight becomes stale.
    pub fn navigate(&mut self, route: Route) -> Ticket {
        self.route = route;
        self.view = View::Loading;
        self.next_ticket()
    }

    /// Select a topic on the current category page and clear its questions.
    /// Returns `None` when no category page is showing.
    pub fn select_topic(&mut self, subcategory: Subcategory) -> Option<Ticket> {
        let View::Category(page) = &mut self.view else {
            return None;
        };
        page.selected = Some(subcategory);
        page.questions.clear();
        Some(self.next_ticket())
    }

    pub fn apply_home(&mut self, ticket: Ticket, result: Result<Vec<Category>, CatalogError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok(categories) => View::Home { categories },
            Err(e) => View::Failed(e.to_string()),
        };
        true
    }

    /// Apply a loaded category. Resets the selected topic.
    pub fn apply_category(
        &mut self,
        ticket: Ticket,
        result: Result<(Category, Vec<Subcategory>), CatalogError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok((category, subcategories)) => View::Category(CategoryPage {
                category,
                subcategories,
                selected: None,
                questions: Vec::new(),
            }),
            Err(e) => View::Failed(e.to_string()),
        };
        true
    }

    pub fn apply_questions(&mut self, ticket: Ticket, result: Result<Vec<Question>, CatalogError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                self.view = View::Failed(e.to_string());
                return true;
            }
        };
        let View::Category(page) = &mut self.view else {
            return false;
        };
        page.questions = questions;
        true
    }

    /// Replace the view with a blocking message, unless the ticket is stale.
    pub fn fail(&mut self, ticket: Ticket, error: CatalogError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.view = View::Failed(error.to_string());
        true
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        let current = ticket.0 == self.generation;
        if !current {
            tracing::debug!(
                ticket = ticket.0,
                generation = self.generation,
                "dropping stale result"
            );
        }
        current
    }
}

/// Resolve a route into the view it shows. Fetch and lookup errors end up
/// as [`View::Failed`].
pub async fn load_view<C: Catalog>(catalog: &C, route: Route) -> View {
    let mut state = BrowseState::default();
    let ticket = state.navigate(route.clone());

    let (slug, topic) = match route {
        Route::Home => {
            state.apply_home(ticket, load_home(catalog).await);
            return state.into_view();
        }
        Route::Category { slug, topic } => (slug, topic),
    };

    state.apply_category(ticket, load_category(catalog, &slug).await);
    let Some(topic) = topic else {
        return state.into_view();
    };

    let lookup = match state.view() {
        View::Category(page) => Some(find_topic(&page.category, &page.subcategories, &topic).cloned()),
        _ => None,
    };
    let Some(lookup) = lookup else {
        return state.into_view();
    };
    match lookup {
        Ok(selected) => {
            if let Some(ticket) = state.select_topic(selected.clone()) {
                state.apply_questions(ticket, load_questions(catalog, &selected).await);
            }
        }
        Err(e) => {
            state.fail(ticket, e);
        }
    }

    state.into_view()
}

pub async fn load_home<C: Catalog>(catalog: &C) -> Result<Vec<Category>, CatalogError> {
    catalog.list_categories().await
}

/// Look a category up by slug and fetch its topics.
pub async fn load_category<C: Catalog>(
    catalog: &C,
    slug: &str,
) -> Result<(Category, Vec<Subcategory>), CatalogError> {
    let category = catalog
        .list_categories()
        .await?
        .into_iter()
        .find(|category| category.slug == slug)
        .ok_or_else(|| CatalogError::NotFound(slug.to_string()))?;

    let subcategories = catalog.list_subcategories(category.id).await?;
    Ok((category, subcategories))
}

pub async fn load_questions<C: Catalog>(
    catalog: &C,
    subcategory: &Subcategory,
) -> Result<Vec<Question>, CatalogError> {
    catalog.list_questions(subcategory.id).await
}

pub fn find_topic<'a>(
    category: &Category,
    subcategories: &'a [Subcategory],
    slug: &str,
) -> Result<&'a Subcategory, CatalogError> {
    subcategories
        .iter()
        .find(|sub| sub.slug == slug)
        .ok_or_else(|| CatalogError::TopicNotFound {
            category: category.slug.clone(),
            topic: slug.to_string(),
        })
}

/// A category with its topics and their questions, ready for export.
#[derive(Debug, Clone)]
pub struct StudySheet {
    pub category: Category,
    pub topics: Vec<(Subcategory, Vec<Question>)>,
}

/// Fetch a whole category, or one topic of it when `topic` is given.
pub async fn load_study_sheet<C: Catalog>(
    catalog: &C,
    slug: &str,
    topic: Option<&str>,
) -> Result<StudySheet, CatalogError> {
    let (category, subcategories) = load_category(catalog, slug).await?;

    let selected = match topic {
        Some(topic) => vec![find_topic(&category, &subcategories, topic)?.clone()],
        None => subcategories,
    };

    let mut topics = Vec::with_capacity(selected.len());
    for subcategory in selected {
        let questions = load_questions(catalog, &subcategory).await?;
        topics.push((subcategory, questions));
    }

    Ok(StudySheet { category, topics })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Difficulty;

    struct FakeCatalog {
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        questions: Vec<(i64, Question)>,
    }

    impl Catalog for FakeCatalog {
        async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
            Ok(self.categories.clone())
        }

        async fn list_subcategories(&self, category_id: i64) -> Result<Vec<Subcategory>, CatalogError> {
            Ok(self
                .subcategories
                .iter()
                .filter(|sub| sub.category_id == category_id)
                .cloned()
                .collect())
        }

        async fn list_questions(&self, subcategory_id: i64) -> Result<Vec<Question>, CatalogError> {
            Ok(self
                .questions
                .iter()
                .filter(|(sub, _)| *sub == subcategory_id)
                .map(|(_, question)| question.clone())
                .collect())
        }
    }

    fn category(id: i64, slug: &str) -> Category {
        Category {
            id,
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            overview: None,
        }
    }

    fn topic(id: i64, category_id: i64, slug: &str) -> Subcategory {
        Subcategory {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            category_id,
        }
    }

    fn question(id: i64, text: &str) -> Question {
        Question {
            id,
            question_text: text.to_string(),
            answer_text: Some(format!("Answer to {text}")),
            difficulty: Difficulty::Easy,
        }
    }

    fn fake() -> FakeCatalog {
        FakeCatalog {
            categories: vec![category(1, "api"), category(2, "selenium")],
            subcategories: vec![topic(10, 1, "rest"), topic(11, 1, "graphql"), topic(20, 2, "waits")],
            questions: vec![(10, question(100, "GET vs POST")), (11, question(110, "Schema"))],
        }
    }

    #[test]
    fn parse_routes() {
        assert_eq!(Route::parse("/"), Ok(Route::Home));
        assert_eq!(Route::parse(""), Ok(Route::Home));
        assert_eq!(Route::parse("/api"), Ok(Route::category("api")));
        assert_eq!(Route::parse("api/"), Ok(Route::category("api")));
        assert_eq!(
            "/api/rest".parse(),
            Ok(Route::Category {
                slug: "api".to_string(),
                topic: Some("rest".to_string()),
            })
        );
        assert!(Route::parse("/a/b/c").is_err());
    }

    #[test]
    fn empty_route_segments_are_rejected() {
        assert!(Route::parse("/api//rest").is_err());
        assert!(Route::parse("//api").is_err());
        assert!(Route::parse("/api//").is_err());
        assert!(Route::parse("//").is_err());
    }

    #[test]
    fn stale_category_result_is_dropped() {
        let mut state = BrowseState::default();
        let first = state.navigate(Route::category("api"));
        let second = state.navigate(Route::category("selenium"));

        assert!(state.apply_category(second, Ok((category(2, "selenium"), vec![]))));
        // The slower, older response arrives last
        assert!(!state.apply_category(first, Ok((category(1, "api"), vec![]))));

        let View::Category(page) = state.view() else {
            panic!("expected category view, got {:?}", state.view());
        };
        assert_eq!(page.category.slug, "selenium");
        assert_eq!(state.route(), &Route::category("selenium"));
    }

    #[test]
    fn stale_questions_are_dropped() {
        let mut state = BrowseState::default();
        let ticket = state.navigate(Route::category("api"));
        state.apply_category(ticket, Ok((category(1, "api"), vec![topic(10, 1, "rest"), topic(11, 1, "graphql")])));

        let rest = state.select_topic(topic(10, 1, "rest")).unwrap();
        let graphql = state.select_topic(topic(11, 1, "graphql")).unwrap();

        assert!(!state.apply_questions(rest, Ok(vec![question(100, "GET vs POST")])));
        assert!(state.apply_questions(graphql, Ok(vec![question(110, "Schema")])));

        let View::Category(page) = state.view() else {
            panic!("expected category view");
        };
        assert_eq!(page.selected.as_ref().map(|sub| sub.slug.as_str()), Some("graphql"));
        assert_eq!(page.questions, vec![question(110, "Schema")]);
    }

    #[test]
    fn navigation_invalidates_pending_questions() {
        let mut state = BrowseState::default();
        let ticket = state.navigate(Route::category("api"));
        state.apply_category(ticket, Ok((category(1, "api"), vec![topic(10, 1, "rest")])));
        let pending = state.select_topic(topic(10, 1, "rest")).unwrap();

        state.navigate(Route::Home);
        assert!(!state.apply_questions(pending, Ok(vec![question(100, "GET vs POST")])));
        assert_eq!(state.view(), &View::Loading);
    }

    #[test]
    fn select_topic_needs_category_page() {
        let mut state = BrowseState::default();
        state.navigate(Route::Home);
        assert_eq!(state.select_topic(topic(10, 1, "rest")), None);
    }

    #[test]
    fn errors_become_blocking_message() {
        let mut state = BrowseState::default();
        let ticket = state.navigate(Route::category("nope"));
        state.apply_category(ticket, Err(CatalogError::NotFound("nope".to_string())));
        assert_eq!(state.view(), &View::Failed("category `nope` not found".to_string()));
    }

    #[tokio::test]
    async fn view_for_home() {
        let View::Home { categories } = load_view(&fake(), Route::Home).await else {
            panic!("expected home view");
        };
        assert_eq!(categories.len(), 2);
    }

    #[tokio::test]
    async fn view_for_category_lists_topics() {
        let View::Category(page) = load_view(&fake(), Route::category("api")).await else {
            panic!("expected category view");
        };
        assert_eq!(page.subcategories.len(), 2);
        assert_eq!(page.selected, None);
        assert!(page.questions.is_empty());
    }

    #[tokio::test]
    async fn view_for_topic_loads_its_questions() {
        let route = Route::parse("/api/graphql").unwrap();
        let View::Category(page) = load_view(&fake(), route).await else {
            panic!("expected category view");
        };
        assert_eq!(page.selected.map(|sub| sub.id), Some(11));
        assert_eq!(page.questions, vec![question(110, "Schema")]);
    }

    #[tokio::test]
    async fn view_for_unknown_topic_or_category_fails() {
        assert_eq!(
            load_view(&fake(), Route::parse("/api/soap").unwrap()).await,
            View::Failed("topic `soap` not found in category `api`".to_string())
        );
        assert_eq!(
            load_view(&fake(), Route::parse("/cooking/soup").unwrap()).await,
            View::Failed("category `cooking` not found".to_string())
        );
    }

    #[tokio::test]
    async fn load_category_by_slug() {
        let (found, topics) = load_category(&fake(), "api").await.unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(
            topics.iter().map(|sub| sub.slug.as_str()).collect::<Vec<_>>(),
            vec!["rest", "graphql"]
        );
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let err = load_category(&fake(), "missing").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(slug) if slug == "missing"));
    }

    #[tokio::test]
    async fn study_sheet_for_whole_category_and_single_topic() {
        let catalog = fake();

        let sheet = load_study_sheet(&catalog, "api", None).await.unwrap();
        assert_eq!(sheet.topics.len(), 2);
        assert_eq!(sheet.topics[0].1, vec![question(100, "GET vs POST")]);

        let sheet = load_study_sheet(&catalog, "api", Some("graphql")).await.unwrap();
        assert_eq!(sheet.topics.len(), 1);
        assert_eq!(sheet.topics[0].0.slug, "graphql");

        let err = load_study_sheet(&catalog, "api", Some("soap")).await.unwrap_err();
        assert!(matches!(err, CatalogError::TopicNotFound { .. }));
    }
}
