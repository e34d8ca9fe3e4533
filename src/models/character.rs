//! Paginated API listing and the row shape stored in the `characters` table

use serde::{Deserialize, Serialize};

/// One page of a paginated listing: `{ info: {...}, results: [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default)]
    pub info: PageInfo,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Pagination metadata; `next` is absent or null on the last page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// Name/URL reference to a related resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Character record as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCharacter {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default, rename = "type")]
    pub subtype: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub origin: Option<NamedRef>,
    #[serde(default)]
    pub location: Option<NamedRef>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Fixed-shape row persisted per character
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRow {
    pub id: i64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    pub subtype: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub created: Option<String>,
}

fn ref_name(reference: Option<NamedRef>) -> Option<String> {
    reference
        .and_then(|r| r.name)
        .filter(|name| !name.is_empty())
}

impl From<ApiCharacter> for CharacterRow {
    fn from(character: ApiCharacter) -> Self {
        Self {
            id: character.id,
            name: character.name,
            status: character.status,
            species: character.species,
            subtype: character.subtype,
            gender: character.gender,
            origin: ref_name(character.origin),
            location: ref_name(character.location),
            image: character.image,
            created: character.created,
        }
    }
}
