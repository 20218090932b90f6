use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Report category matching the `report_category` database enum.
///
/// The wire and database spelling is the human-readable display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_category")]
pub enum Category {
    #[serde(rename = "Road Hazards")]
    #[sqlx(rename = "Road Hazards")]
    RoadHazards,
    #[serde(rename = "Public Safety")]
    #[sqlx(rename = "Public Safety")]
    PublicSafety,
    #[serde(rename = "Environmental Issues")]
    #[sqlx(rename = "Environmental Issues")]
    EnvironmentalIssues,
    #[serde(rename = "Infrastructure Problems")]
    #[sqlx(rename = "Infrastructure Problems")]
    InfrastructureProblems,
    #[serde(rename = "Animal Control")]
    #[sqlx(rename = "Animal Control")]
    AnimalControl,
    #[serde(rename = "Health & Sanitation")]
    #[sqlx(rename = "Health & Sanitation")]
    HealthAndSanitation,
    #[serde(rename = "Weather-Related Issues")]
    #[sqlx(rename = "Weather-Related Issues")]
    WeatherRelatedIssues,
}

/// Report subcategory matching the `report_subcategory` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_subcategory")]
pub enum Subcategory {
    // Road Hazards
    #[serde(rename = "Potholes")]
    #[sqlx(rename = "Potholes")]
    Potholes,
    #[serde(rename = "Fallen Trees")]
    #[sqlx(rename = "Fallen Trees")]
    FallenTrees,
    #[serde(rename = "Damaged Traffic Signs")]
    #[sqlx(rename = "Damaged Traffic Signs")]
    DamagedTrafficSigns,
    // Public Safety
    #[serde(rename = "Suspicious Activity")]
    #[sqlx(rename = "Suspicious Activity")]
    SuspiciousActivity,
    #[serde(rename = "Vandalism")]
    #[sqlx(rename = "Vandalism")]
    Vandalism,
    #[serde(rename = "Noise Complaints")]
    #[sqlx(rename = "Noise Complaints")]
    NoiseComplaints,
    // Environmental Issues
    #[serde(rename = "Illegal Dumping")]
    #[sqlx(rename = "Illegal Dumping")]
    IllegalDumping,
    #[serde(rename = "Air Pollution")]
    #[sqlx(rename = "Air Pollution")]
    AirPollution,
    #[serde(rename = "Water Pollution")]
    #[sqlx(rename = "Water Pollution")]
    WaterPollution,
    // Infrastructure Problems
    #[serde(rename = "Broken Streetlights")]
    #[sqlx(rename = "Broken Streetlights")]
    BrokenStreetlights,
    #[serde(rename = "Faulty Power Lines")]
    #[sqlx(rename = "Faulty Power Lines")]
    FaultyPowerLines,
    #[serde(rename = "Water Pipe Leaks")]
    #[sqlx(rename = "Water Pipe Leaks")]
    WaterPipeLeaks,
    // Animal Control
    #[serde(rename = "Stray Animals")]
    #[sqlx(rename = "Stray Animals")]
    StrayAnimals,
    #[serde(rename = "Animal Abuse")]
    #[sqlx(rename = "Animal Abuse")]
    AnimalAbuse,
    #[serde(rename = "Dead Animals on Roads")]
    #[sqlx(rename = "Dead Animals on Roads")]
    DeadAnimalsOnRoads,
    // Health & Sanitation
    #[serde(rename = "Overflowing Trash Bins")]
    #[sqlx(rename = "Overflowing Trash Bins")]
    OverflowingTrashBins,
    #[serde(rename = "Hazardous Waste Disposal")]
    #[sqlx(rename = "Hazardous Waste Disposal")]
    HazardousWasteDisposal,
    #[serde(rename = "Public Restrooms Issues")]
    #[sqlx(rename = "Public Restrooms Issues")]
    PublicRestroomsIssues,
    // Weather-Related Issues
    #[serde(rename = "Flooding")]
    #[sqlx(rename = "Flooding")]
    Flooding,
    #[serde(rename = "Storm Damage")]
    #[sqlx(rename = "Storm Damage")]
    StormDamage,
    #[serde(rename = "Snow/Ice Accumulation")]
    #[sqlx(rename = "Snow/Ice Accumulation")]
    SnowIceAccumulation,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::RoadHazards,
        Category::PublicSafety,
        Category::EnvironmentalIssues,
        Category::InfrastructureProblems,
        Category::AnimalControl,
        Category::HealthAndSanitation,
        Category::WeatherRelatedIssues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RoadHazards => "Road Hazards",
            Category::PublicSafety => "Public Safety",
            Category::EnvironmentalIssues => "Environmental Issues",
            Category::InfrastructureProblems => "Infrastructure Problems",
            Category::AnimalControl => "Animal Control",
            Category::HealthAndSanitation => "Health & Sanitation",
            Category::WeatherRelatedIssues => "Weather-Related Issues",
        }
    }

    pub fn subcategories(&self) -> &'static [Subcategory] {
        use Subcategory::*;
        match self {
            Category::RoadHazards => &[Potholes, FallenTrees, DamagedTrafficSigns],
            Category::PublicSafety => &[SuspiciousActivity, Vandalism, NoiseComplaints],
            Category::EnvironmentalIssues => &[IllegalDumping, AirPollution, WaterPollution],
            Category::InfrastructureProblems => {
                &[BrokenStreetlights, FaultyPowerLines, WaterPipeLeaks]
            }
            Category::AnimalControl => &[StrayAnimals, AnimalAbuse, DeadAnimalsOnRoads],
            Category::HealthAndSanitation => &[
                OverflowingTrashBins,
                HazardousWasteDisposal,
                PublicRestroomsIssues,
            ],
            Category::WeatherRelatedIssues => &[Flooding, StormDamage, SnowIceAccumulation],
        }
    }

    pub fn contains(&self, subcategory: Subcategory) -> bool {
        subcategory.category() == *self
    }
}

impl Subcategory {
    /// The single category this subcategory belongs to
    pub fn category(&self) -> Category {
        use Subcategory::*;
        match self {
            Potholes | FallenTrees | DamagedTrafficSigns => Category::RoadHazards,
            SuspiciousActivity | Vandalism | NoiseComplaints => Category::PublicSafety,
            IllegalDumping | AirPollution | WaterPollution => Category::EnvironmentalIssues,
            BrokenStreetlights | FaultyPowerLines | WaterPipeLeaks => {
                Category::InfrastructureProblems
            }
            StrayAnimals | AnimalAbuse | DeadAnimalsOnRoads => Category::AnimalControl,
            OverflowingTrashBins | HazardousWasteDisposal | PublicRestroomsIssues => {
                Category::HealthAndSanitation
            }
            Flooding | StormDamage | SnowIceAccumulation => Category::WeatherRelatedIssues,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Subcategory::*;
        match self {
            Potholes => "Potholes",
            FallenTrees => "Fallen Trees",
            DamagedTrafficSigns => "Damaged Traffic Signs",
            SuspiciousActivity => "Suspicious Activity",
            Vandalism => "Vandalism",
            NoiseComplaints => "Noise Complaints",
            IllegalDumping => "Illegal Dumping",
            AirPollution => "Air Pollution",
            WaterPollution => "Water Pollution",
            BrokenStreetlights => "Broken Streetlights",
            FaultyPowerLines => "Faulty Power Lines",
            WaterPipeLeaks => "Water Pipe Leaks",
            StrayAnimals => "Stray Animals",
            AnimalAbuse => "Animal Abuse",
            DeadAnimalsOnRoads => "Dead Animals on Roads",
            OverflowingTrashBins => "Overflowing Trash Bins",
            HazardousWasteDisposal => "Hazardous Waste Disposal",
            PublicRestroomsIssues => "Public Restrooms Issues",
            Flooding => "Flooding",
            StormDamage => "Storm Damage",
            SnowIceAccumulation => "Snow/Ice Accumulation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", s)))
    }
}

impl FromStr for Subcategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .flat_map(|c| c.subcategories().iter().copied())
            .find(|sub| sub.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown subcategory: {}", s)))
    }
}

/// Parse a category/subcategory pair and check membership
pub fn parse_pair(category: &str, subcategory: &str) -> Result<(Category, Subcategory), AppError> {
    let invalid = || AppError::Validation("Invalid category-subcategory combination".to_string());

    let category = category.parse::<Category>().map_err(|_| invalid())?;
    let subcategory = subcategory.parse::<Subcategory>().map_err(|_| invalid())?;

    if !category.contains(subcategory) {
        return Err(invalid());
    }

    Ok((category, subcategory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subcategory_maps_back_to_its_category() {
        for category in Category::ALL {
            assert_eq!(category.subcategories().len(), 3);
            for sub in category.subcategories() {
                assert_eq!(sub.category(), category);
            }
        }
    }

    #[test]
    fn test_pair_valid_iff_member() {
        for category in Category::ALL {
            for owner in Category::ALL {
                for sub in owner.subcategories() {
                    let result = parse_pair(category.as_str(), sub.as_str());
                    assert_eq!(result.is_ok(), category == owner, "{} / {}", category, sub);
                }
            }
        }
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(parse_pair("Road Hazards", "Sinkholes").is_err());
        assert!(parse_pair("road hazards", "Potholes").is_err());
        assert!("Weather-Related Issues".parse::<Category>().is_ok());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::HealthAndSanitation).unwrap();
        assert_eq!(json, "\"Health & Sanitation\"");

        let sub: Subcategory = serde_json::from_str("\"Snow/Ice Accumulation\"").unwrap();
        assert_eq!(sub, Subcategory::SnowIceAccumulation);
    }
}
