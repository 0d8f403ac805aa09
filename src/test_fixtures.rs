//! Shared types for unit tests

use crate::mapping::FieldMapping;

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: i64,
    pub english_name: String,
    pub chinese_name: String,
    pub abbreviation: String,
}

crate::impl_entity!(Country, "country", {
    "id" => id,
    "englishName" => english_name,
    "chineseName" => chinese_name,
    "abbreviation" => abbreviation,
});

#[derive(Debug, Clone, PartialEq)]
pub struct CountryResource {
    pub id: i64,
    pub english_name: String,
    pub chinese_name: String,
    pub abbreviation: String,
}

crate::impl_resource!(CountryResource, "country", {
    "id" => id,
    "englishName" => english_name,
    "chineseName" => chinese_name,
    "abbreviation" => abbreviation,
});

impl From<&Country> for CountryResource {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            english_name: country.english_name.clone(),
            chinese_name: country.chinese_name.clone(),
            abbreviation: country.abbreviation.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct City {
    pub id: i64,
    pub name: String,
}

crate::impl_entity!(City, "city", {
    "id" => id,
    "name" => name,
});

#[derive(Debug, Clone)]
pub struct CityResource {
    pub id: i64,
    pub name: String,
}

crate::impl_resource!(CityResource, "city", {
    "id" => id,
    "name" => name,
});

impl From<&City> for CityResource {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
        }
    }
}

pub fn country(id: i64, english_name: &str, chinese_name: &str, abbreviation: &str) -> Country {
    Country {
        id,
        english_name: english_name.to_string(),
        chinese_name: chinese_name.to_string(),
        abbreviation: abbreviation.to_string(),
    }
}

pub fn china() -> CountryResource {
    CountryResource::from(&country(1, "China", "中国", "CN"))
}

pub fn countries() -> Vec<Country> {
    vec![
        country(1, "China", "中国", "CN"),
        country(2, "Japan", "日本", "JP"),
        country(3, "France", "法国", "FR"),
        country(4, "Brazil", "巴西", "BR"),
        country(5, "Egypt", "埃及", "EG"),
    ]
}

/// Identity mapping of every country field
pub fn country_mapping() -> FieldMapping<CountryResource, Country> {
    FieldMapping::builder()
        .map_same("id")
        .map_same("englishName")
        .map_same("chineseName")
        .map_same("abbreviation")
        .build()
        .expect("country mapping is valid")
}
