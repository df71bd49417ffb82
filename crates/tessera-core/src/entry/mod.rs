//! Journal Entry - The fundamental unit of the engine
//!
//! Entries are owned by the external entry store and read-only here.
//! Structured tags (`@type:name`) are parsed once at construction so the
//! analyzers never re-parse prefix strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ENTRY TYPES
// ============================================================================

/// Types of journal entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A task or to-do item; carries no mood signal
    Task,
    /// Mixed task and reflection content
    #[default]
    Mixed,
    /// A reflective journal entry
    Reflection,
    /// An emotional vent
    Vent,
}

impl EntryType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Task => "task",
            EntryType::Mixed => "mixed",
            EntryType::Reflection => "reflection",
            EntryType::Vent => "vent",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "task" => EntryType::Task,
            "reflection" => EntryType::Reflection,
            "vent" => EntryType::Vent,
            _ => EntryType::Mixed,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ENTITY TAGS
// ============================================================================

/// Entity categories a structured tag can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Place,
    Goal,
    Situation,
    /// Self-referential observations (`@self:...`)
    #[serde(rename = "self")]
    SelfRef,
    Activity,
    Media,
    Event,
    Food,
    Topic,
}

impl EntityType {
    /// Convert to the tag prefix form
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Place => "place",
            EntityType::Goal => "goal",
            EntityType::Situation => "situation",
            EntityType::SelfRef => "self",
            EntityType::Activity => "activity",
            EntityType::Media => "media",
            EntityType::Event => "event",
            EntityType::Food => "food",
            EntityType::Topic => "topic",
        }
    }

    /// Parse a tag prefix; unknown prefixes are not entity types
    pub fn parse_name(s: &str) -> Option<Self> {
        match s {
            "person" => Some(EntityType::Person),
            "place" => Some(EntityType::Place),
            "goal" => Some(EntityType::Goal),
            "situation" => Some(EntityType::Situation),
            "self" => Some(EntityType::SelfRef),
            "activity" => Some(EntityType::Activity),
            "media" => Some(EntityType::Media),
            "event" => Some(EntityType::Event),
            "food" => Some(EntityType::Food),
            "topic" => Some(EntityType::Topic),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured entity tag parsed from the `@type:name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTag {
    /// Entity category
    pub entity_type: EntityType,
    /// Entity name, lowercased
    pub name: String,
}

impl EntityTag {
    /// Create a tag directly
    pub fn new(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            entity_type,
            name: name.into().to_lowercase(),
        }
    }

    /// Parse a raw tag string. Returns `None` for plain tags and unknown
    /// type prefixes; those are ignored, not errors.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('@')?;
        let (type_part, name_part) = rest.split_once(':')?;
        let entity_type = EntityType::parse_name(&type_part.to_lowercase())?;
        let name = name_part.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        Some(Self { entity_type, name })
    }

    /// Tokens of the name, split on whitespace, `-` and `_`
    pub fn name_tokens(&self) -> impl Iterator<Item = &str> {
        self.name
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|t| !t.is_empty())
    }
}

impl std::fmt::Display for EntityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}:{}", self.entity_type, self.name)
    }
}

// ============================================================================
// JOURNAL ENTRY
// ============================================================================

/// A journal entry as read from the entry store
///
/// `effective_date`, when present, is authoritative for temporal bucketing
/// and recency; it may predate `created_at` for backdated entries. Both
/// fields are validated timestamps - an entry without a usable timestamp is
/// unrepresentable past the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque unique identifier
    pub id: String,
    /// Free-form entry text
    pub text: String,
    /// Entry category (e.g. "personal", "work")
    pub category: String,
    /// Raw tags, structured and plain, in original order
    pub tags: Vec<String>,
    /// Structured tags parsed from `tags` at construction
    pub entities: Vec<EntityTag>,
    /// Embedding vector; absent until the external embedding step ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Mood score in [0,1]; absent for purely task-type entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_score: Option<f64>,
    /// Entry type
    pub entry_type: EntryType,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
    /// Authoritative date for backdated entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a new entry with a generated UUID v4 id
    pub fn new(text: impl Into<String>, category: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            category: category.into(),
            tags: Vec::new(),
            entities: Vec::new(),
            embedding: None,
            mood_score: None,
            entry_type,
            created_at: Utc::now(),
            effective_date: None,
        }
    }

    /// Attach raw tags, parsing the structured ones
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.entities = tags.iter().filter_map(|t| EntityTag::parse(t)).collect();
        self.tags = tags;
        self
    }

    /// Attach a mood score
    pub fn with_mood(mut self, mood: f64) -> Self {
        self.mood_score = Some(mood.clamp(0.0, 1.0));
        self
    }

    /// Attach an embedding vector
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Override the creation timestamp
    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Set an authoritative effective date (backdated entries)
    pub fn effective_on(mut self, at: DateTime<Utc>) -> Self {
        self.effective_date = Some(at);
        self
    }

    /// The timestamp used for bucketing and recency
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.effective_date.unwrap_or(self.created_at)
    }

    /// The later of the recorded and effective timestamps.
    ///
    /// Proxy for when the entry last changed: a backdated entry written
    /// today must count as a change today, not on its effective date.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.effective_date
            .map_or(self.created_at, |d| d.max(self.created_at))
    }

    /// Whether this entry participates in mood aggregation.
    ///
    /// Task entries never do, even if a mood score slipped onto them.
    pub fn is_mood_bearing(&self) -> bool {
        self.mood_score.is_some() && self.entry_type != EntryType::Task
    }

    /// Structured tags of the given entity type
    pub fn entities_of(&self, entity_type: EntityType) -> impl Iterator<Item = &EntityTag> {
        self.entities
            .iter()
            .filter(move |e| e.entity_type == entity_type)
    }
}

/// Filter to mood-bearing entries, optionally scoped to a category
pub fn mood_bearing<'a>(
    entries: &'a [Entry],
    category: Option<&'a str>,
) -> impl Iterator<Item = &'a Entry> {
    entries
        .iter()
        .filter(|e| e.is_mood_bearing())
        .filter(move |e| category.is_none_or(|c| e.category == c))
}

/// Filter entries to a category, keeping all entry types
pub fn in_category<'a>(
    entries: &'a [Entry],
    category: Option<&'a str>,
) -> impl Iterator<Item = &'a Entry> {
    entries
        .iter()
        .filter(move |e| category.is_none_or(|c| e.category == c))
}

// ============================================================================
// TESTS
// ============================================================================
