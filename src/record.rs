use std::fmt;

use serde::{Deserialize, Serialize};

/// One patient case from the sepsis survival study.
///
/// Codes are kept exactly as they appear in the file; [`Sex`] and [`Outcome`]
/// only interpret them for display.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PatientRecord {
    #[serde(rename = "age_years")]
    pub age: f64,

    /// 0 = male, 1 = female
    #[serde(rename = "sex_0male_1female")]
    pub sex: u8,

    #[serde(rename = "episode_number")]
    pub episode_number: u32,

    /// 1 = survived, 0 = died
    #[serde(rename = "hospital_outcome_1alive_0dead")]
    pub outcome: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_code(code: u8) -> Self {
        if code == 0 { Sex::Male } else { Sex::Female }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Died,
    Survived,
}

impl Outcome {
    pub fn from_code(code: u8) -> Self {
        if code == 0 {
            Outcome::Died
        } else {
            Outcome::Survived
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Died => "died",
            Outcome::Survived => "survived",
        }
    }
}

impl PatientRecord {
    pub fn new(age: f64, sex: u8, episode_number: u32, outcome: u8) -> Self {
        PatientRecord {
            age,
            sex,
            episode_number,
            outcome,
        }
    }

    /// Everything the classifier sees: the record minus its outcome.
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            age: self.age,
            sex: self.sex,
            episode_number: self.episode_number,
        }
    }

    /// The outcome as a classifier label.
    pub fn label(&self) -> usize {
        self.outcome as usize
    }

    /// The ground-truth label as it is compared against predictions.
    pub fn expected_label(&self) -> String {
        self.outcome.to_string()
    }

    /// e.g. `47 year old female, 2 episode(s), patient survived`
    pub fn case_description(&self) -> String {
        format!(
            "{} year old {}, {} episode(s), patient {}",
            self.age,
            Sex::from_code(self.sex).as_str(),
            self.episode_number,
            Outcome::from_code(self.outcome).as_str()
        )
    }
}

/// Age, sex and episode number of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub age: f64,
    pub sex: u8,
    pub episode_number: u32,
}

impl FeatureVector {
    /// Number of columns in the classifier's feature space.
    pub const WIDTH: usize = 3;

    pub fn to_array(&self) -> [f64; Self::WIDTH] {
        [self.age, self.sex as f64, self.episode_number as f64]
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.age, self.sex, self.episode_number)
    }
}
