use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

use crate::error::{Result, SatisfactionError};
use crate::types::{round1, PassengerProfile};

pub const REQUIRED_COLUMNS: [&str; 4] = ["customer_type", "type_of_travel", "class", "age"];

/// Half-open age ranges. The labels read as inclusive but the bounds are
/// `[lower, upper)`, so age 30 lands in "31-45".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "0-17")]
    Under18,
    #[serde(rename = "18-30")]
    From18,
    #[serde(rename = "31-45")]
    From30,
    #[serde(rename = "46-60")]
    From45,
    #[serde(rename = "60+")]
    From60,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Under18,
        AgeGroup::From18,
        AgeGroup::From30,
        AgeGroup::From45,
        AgeGroup::From60,
    ];

    pub fn bounds(self) -> (u32, Option<u32>) {
        match self {
            AgeGroup::Under18 => (0, Some(18)),
            AgeGroup::From18 => (18, Some(30)),
            AgeGroup::From30 => (30, Some(45)),
            AgeGroup::From45 => (45, Some(60)),
            AgeGroup::From60 => (60, None),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under18 => "0-17",
            AgeGroup::From18 => "18-30",
            AgeGroup::From30 => "31-45",
            AgeGroup::From45 => "46-60",
            AgeGroup::From60 => "60+",
        }
    }

    /// First range with `lower <= age < upper`, tested in ascending order.
    pub fn of(age: u32) -> AgeGroup {
        for g in Self::ALL {
            let (lo, hi) = g.bounds();
            if age >= lo && hi.map_or(true, |h| age < h) {
                return g;
            }
        }
        // the last range is unbounded
        AgeGroup::From60
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedAttribute {
    CustomerType,
    TypeOfTravel,
    Class,
    AgeGroup,
}

impl TrackedAttribute {
    /// Presentation order.
    pub const ALL: [TrackedAttribute; 4] = [
        TrackedAttribute::CustomerType,
        TrackedAttribute::TypeOfTravel,
        TrackedAttribute::Class,
        TrackedAttribute::AgeGroup,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TrackedAttribute::CustomerType => "Customer Type",
            TrackedAttribute::TypeOfTravel => "Type of Travel",
            TrackedAttribute::Class => "Flight Class",
            TrackedAttribute::AgeGroup => "Age Group",
        }
    }

    /// The profile's value (or age bin) as it appears in the population.
    pub fn selection(self, profile: &PassengerProfile) -> &'static str {
        match self {
            TrackedAttribute::CustomerType => profile.customer_type.label(),
            TrackedAttribute::TypeOfTravel => profile.type_of_travel.label(),
            TrackedAttribute::Class => profile.class.label(),
            TrackedAttribute::AgeGroup => AgeGroup::of(profile.age).label(),
        }
    }

    fn value_of(self, r: &PopulationRecord) -> &str {
        match self {
            TrackedAttribute::CustomerType => &r.customer_type,
            TrackedAttribute::TypeOfTravel => &r.type_of_travel,
            TrackedAttribute::Class => &r.class,
            TrackedAttribute::AgeGroup => AgeGroup::of(r.age).label(),
        }
    }
}

/// Historical passenger, reduced to the tracked columns. Categorical values
/// are kept verbatim so matching is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub customer_type: String,
    pub type_of_travel: String,
    pub class: String,
    pub age: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
    records: Vec<PopulationRecord>,
}

impl PopulationTable {
    pub fn new(records: Vec<PopulationRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &str) -> Result<Self> {
        let file = File::open(Path::new(path)).map_err(|e| SatisfactionError::dataset(path, e))?;
        let table = Self::from_reader(file).map_err(|e| match e {
            SatisfactionError::DatasetLoad { reason, .. } => SatisfactionError::dataset(path, reason),
            other => other,
        })?;
        tracing::debug!("loaded {} reference records from {}", table.len(), path);
        Ok(table)
    }

    /// Reads CSV with a header row; columns beyond the tracked four are ignored.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

        let headers = rdr
            .headers()
            .map_err(|e| SatisfactionError::dataset("<csv>", e))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !headers.iter().any(|h| h == *c))
            .collect();
        if !missing.is_empty() {
            return Err(SatisfactionError::dataset(
                "<csv>",
                format!("missing required columns {:?}", missing),
            ));
        }

        let mut records = Vec::new();
        for (i, rec) in rdr.deserialize::<PopulationRecord>().enumerate() {
            // header is line 1
            let rec = rec.map_err(|e| SatisfactionError::dataset("<csv>", format!("row {}: {}", i + 2, e)))?;
            records.push(rec);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortPercentage {
    pub attribute: TrackedAttribute,
    pub title: String,
    pub selection: String,
    pub matching: usize,
    pub total: usize,
    /// 0-100, one decimal place.
    pub percentage: f64,
}

fn percentage(attr: TrackedAttribute, wanted: &str, population: &PopulationTable) -> Result<CohortPercentage> {
    let total = population.len();
    if total == 0 {
        return Err(SatisfactionError::EmptyPopulation);
    }
    let matching = population
        .records
        .iter()
        .filter(|r| attr.value_of(r) == wanted)
        .count();
    Ok(CohortPercentage {
        attribute: attr,
        title: attr.title().to_string(),
        selection: wanted.to_string(),
        matching,
        total,
        percentage: round1(100.0 * matching as f64 / total as f64),
    })
}

/// Share of the population agreeing with the profile on each tracked
/// attribute, in presentation order.
pub fn compare(profile: &PassengerProfile, population: &PopulationTable) -> Result<Vec<CohortPercentage>> {
    TrackedAttribute::ALL
        .iter()
        .map(|a| percentage(*a, a.selection(profile), population))
        .collect()
}

/// Percentage for any value of one attribute, not only the profile's.
pub fn share_of(attr: TrackedAttribute, value: &str, population: &PopulationTable) -> Result<CohortPercentage> {
    percentage(attr, value, population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerType, TravelClass, TypeOfTravel};

    fn rec(ct: &str, tt: &str, class: &str, age: u32) -> PopulationRecord {
        PopulationRecord {
            customer_type: ct.into(),
            type_of_travel: tt.into(),
            class: class.into(),
            age,
        }
    }

    #[test]
    fn age_bin_boundaries() {
        let cases = [
            (0, "0-17"),
            (17, "0-17"),
            (18, "18-30"),
            (29, "18-30"),
            (30, "31-45"),
            (44, "31-45"),
            (45, "46-60"),
            (59, "46-60"),
            (60, "60+"),
            (120, "60+"),
        ];
        for (age, label) in cases {
            assert_eq!(AgeGroup::of(age).label(), label, "age {}", age);
        }
    }

    #[test]
    fn age_bins_are_exclusive_and_exhaustive() {
        for age in 0..=130u32 {
            let hits = AgeGroup::ALL
                .iter()
                .filter(|g| {
                    let (lo, hi) = g.bounds();
                    age >= lo && hi.map_or(true, |h| age < h)
                })
                .count();
            assert_eq!(hits, 1, "age {}", age);
        }
    }

    #[test]
    fn empty_population_fails() {
        let err = compare(&PassengerProfile::default(), &PopulationTable::default()).unwrap_err();
        assert!(matches!(err, SatisfactionError::EmptyPopulation));
    }

    #[test]
    fn compare_order_and_values() {
        let pop = PopulationTable::new(vec![
            rec("Loyal Customer", "Business travel", "Eco", 25),
            rec("Loyal Customer", "Personal Travel", "Business", 30),
            rec("Disloyal Customer", "Business travel", "Eco", 18),
            rec("Loyal Customer", "Business travel", "Eco Plus", 61),
        ]);
        let out = compare(&PassengerProfile::default(), &pop).unwrap();
        let attrs: Vec<_> = out.iter().map(|c| c.attribute).collect();
        assert_eq!(attrs, TrackedAttribute::ALL.to_vec());

        assert_eq!(out[0].percentage, 75.0);
        assert_eq!(out[1].percentage, 75.0);
        assert_eq!(out[2].percentage, 50.0);
        assert_eq!(out[3].selection, "18-30");
        assert_eq!(out[3].matching, 2);
        assert_eq!(out[3].percentage, 50.0);
    }

    #[test]
    fn categorical_shares_sum_to_hundred() {
        let mut rows = Vec::new();
        for i in 0..7u32 {
            let ct = CustomerType::ALL[(i % 2) as usize].label();
            let tt = TypeOfTravel::ALL[(i % 2) as usize].label();
            let cl = TravelClass::ALL[(i % 3) as usize].label();
            rows.push(rec(ct, tt, cl, 20 + i));
        }
        let pop = PopulationTable::new(rows);

        let sum = |attr, labels: Vec<&str>| -> f64 {
            labels
                .into_iter()
                .map(|l| share_of(attr, l, &pop).unwrap().percentage)
                .sum()
        };
        let ct = sum(TrackedAttribute::CustomerType, CustomerType::ALL.iter().map(|c| c.label()).collect());
        let tt = sum(TrackedAttribute::TypeOfTravel, TypeOfTravel::ALL.iter().map(|c| c.label()).collect());
        let cl = sum(TrackedAttribute::Class, TravelClass::ALL.iter().map(|c| c.label()).collect());
        assert!((ct - 100.0).abs() <= 0.2, "{}", ct);
        assert!((tt - 100.0).abs() <= 0.2, "{}", tt);
        assert!((cl - 100.0).abs() <= 0.3, "{}", cl);
    }

    #[test]
    fn tie_percentages_round_to_even() {
        let mut rows = vec![rec("Loyal Customer", "Business travel", "Eco", 25)];
        for _ in 0..15 {
            rows.push(rec("Disloyal Customer", "Business travel", "Eco", 25));
        }
        let pop = PopulationTable::new(rows);
        // 1/16 = 6.25%
        let c = share_of(TrackedAttribute::CustomerType, "Loyal Customer", &pop).unwrap();
        assert_eq!(c.matching, 1);
        assert_eq!(c.percentage, 6.2);
        // 15/16 = 93.75%
        let c = share_of(TrackedAttribute::CustomerType, "Disloyal Customer", &pop).unwrap();
        assert_eq!(c.percentage, 93.8);
    }

    #[test]
    fn csv_with_extra_columns_loads() {
        let data = "id,customer_type,age,type_of_travel,class,satisfaction\n\
                    1,Loyal Customer,65,Personal Travel,Eco,satisfied\n\
                    2,disloyal Customer,47,Business travel,Business,neutral or dissatisfied\n";
        let t = PopulationTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.records()[1].customer_type, "disloyal Customer");
        assert_eq!(t.records()[0].age, 65);
    }

    #[test]
    fn csv_missing_column_is_dataset_error() {
        let data = "customer_type,type_of_travel,age\nLoyal Customer,Business travel,30\n";
        let err = PopulationTable::from_reader(data.as_bytes()).unwrap_err();
        match err {
            SatisfactionError::DatasetLoad { reason, .. } => assert!(reason.contains("class"), "{}", reason),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn csv_bad_age_is_dataset_error() {
        let data = "customer_type,type_of_travel,class,age\nLoyal Customer,Business travel,Eco,old\n";
        let err = PopulationTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, SatisfactionError::DatasetLoad { .. }));
        assert!(err.to_string().contains("row 2"), "{}", err);
    }
}
