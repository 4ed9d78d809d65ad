/// A state together with the city whose weather stands in for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub city: &'static str,
}

const INDIAN_STATES: [(&str, &str); 29] = [
    ("Andhra Pradesh", "Vijayawada"),
    ("Telangana", "Hyderabad"),
    ("Tamil Nadu", "Chennai"),
    ("Karnataka", "Bengaluru"),
    ("Maharashtra", "Mumbai"),
    ("Delhi", "New Delhi"),
    ("West Bengal", "Kolkata"),
    ("Gujarat", "Ahmedabad"),
    ("Rajasthan", "Jaipur"),
    ("Punjab", "Ludhiana"),
    ("Bihar", "Patna"),
    ("Kerala", "Thiruvananthapuram"),
    ("Madhya Pradesh", "Bhopal"),
    ("Uttar Pradesh", "Lucknow"),
    ("Odisha", "Bhubaneswar"),
    ("Jharkhand", "Ranchi"),
    ("Assam", "Guwahati"),
    ("Chhattisgarh", "Raipur"),
    ("Haryana", "Chandigarh"),
    ("Himachal Pradesh", "Shimla"),
    ("Uttarakhand", "Dehradun"),
    ("Goa", "Panaji"),
    ("Manipur", "Imphal"),
    ("Meghalaya", "Shillong"),
    ("Mizoram", "Aizawl"),
    ("Nagaland", "Kohima"),
    ("Tripura", "Agartala"),
    ("Sikkim", "Gangtok"),
    ("Arunachal Pradesh", "Itanagar"),
];

/// Ordered, read-only mapping from state name to its representative city.
///
/// Iteration order is fixed and is the order in which intent extraction
/// reports matches.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// The 29 Indian states the assistant knows about.
    pub fn india() -> Self {
        let regions = INDIAN_STATES
            .iter()
            .map(|&(name, city)| Region { name, city })
            .collect();

        Self { regions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.regions.iter().map(|r| r.name).collect()
    }

    /// Case-insensitive exact lookup by state name.
    pub fn find(&self, name: &str) -> Option<&Region> {
        let wanted = name.trim();
        self.regions.iter().find(|r| r.name.eq_ignore_ascii_case(wanted))
    }

    pub fn city_for(&self, name: &str) -> Option<&'static str> {
        self.find(name).map(|r| r.city)
    }
}
