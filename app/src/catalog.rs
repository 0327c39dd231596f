//! Static district/route catalog.
//!
//! The catalog is built once and never mutated. Districts keep their
//! declaration order, which is also the order of the root menu.

use crate::error::{BotError, Result};
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub boxes: u32,
    pub entrances: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    pub name: String,
    pub routes: Vec<String>,
}

impl District {
    pub fn new(name: impl Into<String>, routes: &[&str]) -> Self {
        Self {
            name: name.into(),
            routes: routes.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    districts: Vec<District>,
    route_index: HashMap<String, usize>,
    stats: HashMap<String, Stats>,
}

const DISTRICTS: &[(&str, &[&str])] = &[
    (
        "Западный",
        &[
            "1201", "1202", "1203", "1204", "1205", "1206", "1207", "1208", "1209", "1210", "1301",
            "1302", "1303", "1304", "1305", "1306", "1307", "1308", "1309", "1310", "1401", "1402",
            "1403", "1404", "1405", "1406", "1407", "1408", "1409", "1410", "1411", "1501", "1502",
            "1503", "1504", "1505", "1506", "1507", "1508",
        ],
    ),
    (
        "Ленина",
        &[
            "2101", "2102", "2103", "2104", "2105", "2106", "2107", "2108", "2109", "2110",
        ],
    ),
    (
        "Каменка+Военвед",
        &[
            "2111", "4301", "4302", "4303", "4304", "4305", "4306", "4307", "4308",
        ],
    ),
    (
        "Александровка",
        &["3101", "3102", "3103", "3104", "3105", "3106", "3107", "3108"],
    ),
    (
        "Темерник+Чкаловский",
        &[
            "3201", "3202", "3203", "3204", "3205", "3206", "3207", "3208", "3209", "3210", "3211",
            "3212", "3213",
        ],
    ),
    (
        "Северный район",
        &[
            "4101", "4102", "4103", "4104", "4105", "4106", "4107", "4108", "4109", "4110", "4201",
            "4202", "4203", "4204", "4205", "4206", "4207", "4208", "4209", "4210", "4211", "4212",
            "4213", "4214", "4215",
        ],
    ),
    (
        "Суворовский",
        &["4401", "4402", "4403", "4404", "4405", "4406"],
    ),
    (
        "Левенцовка",
        &[
            "1101", "1102", "1103", "1104", "1105", "1106", "1107", "1108", "1109", "1120",
        ],
    ),
    (
        "Центр",
        &[
            "2201", "2202", "2203", "2204", "2205", "2206", "2207", "2208", "2209", "2210", "2211",
            "2212", "2213", "2214", "2215",
        ],
    ),
    ("Сельмаш", &["2301", "2302"]),
    ("Красный Аксай", &["2303", "2304"]),
];

const ROUTE_STATS: &[(&str, Stats)] = &[
    (
        "1201",
        Stats {
            boxes: 2286,
            entrances: 28,
        },
    ),
    (
        "1202",
        Stats {
            boxes: 1971,
            entrances: 46,
        },
    ),
    (
        "1203",
        Stats {
            boxes: 2080,
            entrances: 44,
        },
    ),
    (
        "1120",
        Stats {
            boxes: 2184,
            entrances: 39,
        },
    ),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let districts = DISTRICTS
        .iter()
        .map(|(name, routes)| District::new(*name, routes))
        .collect();
    let stats = ROUTE_STATS
        .iter()
        .map(|(route, stats)| ((*route).to_string(), *stats))
        .collect();
    Catalog::build(districts, stats).0
});

impl Catalog {
    /// Builds a catalog from explicit data.
    ///
    /// Fails if a district has no routes, a district name repeats, or a route
    /// is listed under more than one district.
    pub fn new(districts: Vec<District>, stats: HashMap<String, Stats>) -> Result<Self> {
        if let Some(empty) = districts.iter().find(|d| d.routes.is_empty()) {
            return Err(BotError::InvalidCatalog(format!(
                "district {} has no routes",
                empty.name
            )));
        }

        for (i, district) in districts.iter().enumerate() {
            if districts[..i].iter().any(|d| d.name == district.name) {
                return Err(BotError::InvalidCatalog(format!(
                    "district {} is declared twice",
                    district.name
                )));
            }
        }

        let (catalog, conflicts) = Self::build(districts, stats);
        match conflicts.first() {
            Some(route) => Err(BotError::InvalidCatalog(format!(
                "route {route} belongs to more than one district"
            ))),
            None => Ok(catalog),
        }
    }

    /// The catalog shipped with the bot.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    // First district wins on conflicts; the conflicting routes are reported.
    fn build(districts: Vec<District>, stats: HashMap<String, Stats>) -> (Self, Vec<String>) {
        let mut route_index = HashMap::new();
        let mut conflicts = Vec::new();

        for (idx, district) in districts.iter().enumerate() {
            for route in &district.routes {
                if route_index.contains_key(route) {
                    conflicts.push(route.clone());
                } else {
                    route_index.insert(route.clone(), idx);
                }
            }
        }

        (
            Self {
                districts,
                route_index,
                stats,
            },
            conflicts,
        )
    }

    pub fn districts(&self) -> impl Iterator<Item = &str> {
        self.districts.iter().map(|d| d.name.as_str())
    }

    pub fn routes_of(&self, district: &str) -> Result<&[String]> {
        self.districts
            .iter()
            .find(|d| d.name == district)
            .map(|d| d.routes.as_slice())
            .ok_or_else(|| BotError::UnknownDistrict(district.to_string()))
    }

    pub fn district_of(&self, route: &str) -> Option<&str> {
        self.route_index
            .get(route)
            .map(|&idx| self.districts[idx].name.as_str())
    }

    pub fn stats_of(&self, route: &str) -> Option<Stats> {
        self.stats.get(route).copied()
    }

    pub fn route_count(&self) -> usize {
        self.route_index.len()
    }
}
