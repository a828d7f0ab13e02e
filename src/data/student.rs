use crate::error::{
    InvalidContactNumberSnafu, InvalidDepartmentSnafu, InvalidEmailSnafu, InvalidGenderSnafu,
    MissingFieldSnafu, RosterError, RosterResult,
};
use email_address::EmailAddress;
use maud::Render;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use snafu::{OptionExt, ResultExt, ensure};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Suggested hobbies offered by the form. Anything else typed in is kept as-is.
pub const HOBBIES: [&str; 20] = [
    "Singing",
    "Dancing",
    "Cycling",
    "Badminton",
    "Reading",
    "Watching",
    "Cooking",
    "Painting",
    "Gardening",
    "Hiking",
    "Photography",
    "Traveling",
    "Writing",
    "Gaming",
    "Swimming",
    "Coding",
    "Playing musical instruments",
    "Fishing",
    "Yoga",
    "Collecting stamps",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: ContactNumber,
    pub gender: Gender,
    pub college_name: String,
    pub department: Department,
    pub hobbies: Vec<String>,
    pub dob: String,
}

/// A validated student minus its id: what gets written on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: ContactNumber,
    pub gender: Gender,
    pub college_name: String,
    pub department: Department,
    pub hobbies: Vec<String>,
    pub dob: String,
}

impl StudentForm {
    pub fn into_student(self, id: Uuid) -> Student {
        let Self {
            first_name,
            middle_name,
            last_name,
            email,
            contact_number,
            gender,
            college_name,
            department,
            hobbies,
            dob,
        } = self;

        Student {
            id,
            first_name,
            middle_name,
            last_name,
            email,
            contact_number,
            gender,
            college_name,
            department,
            hobbies,
            dob,
        }
    }
}

impl Student {
    pub fn to_form(&self) -> StudentForm {
        StudentForm {
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            contact_number: self.contact_number.clone(),
            gender: self.gender,
            college_name: self.college_name.clone(),
            department: self.department,
            hobbies: self.hobbies.clone(),
            dob: self.dob.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
    }

    pub fn hobbies_joined(&self) -> String {
        self.hobbies.join(", ")
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Render for Student {
    fn render_to(&self, buffer: &mut String) {
        let name = format!(
            "{} {}",
            capitalise(&self.last_name),
            capitalise(&self.first_name)
        );
        name.render_to(buffer);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(s.trim()))
            .context(InvalidGenderSnafu { original: s })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "CS")]
    Cs,
    #[serde(rename = "other")]
    Other,
}

impl Department {
    pub const ALL: [Self; 4] = [Self::It, Self::Ce, Self::Cs, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::It => "IT",
            Self::Ce => "CE",
            Self::Cs => "CS",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Other => "Other",
            _ => self.as_str(),
        }
    }
}

impl FromStr for Department {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|department| department.as_str().eq_ignore_ascii_case(s.trim()))
            .context(InvalidDepartmentSnafu { original: s })
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly ten ASCII digits, kept as text so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactNumber(String);

impl ContactNumber {
    pub const LEN: usize = 10;

    pub fn parse(raw: &str) -> RosterResult<Self> {
        let trimmed = raw.trim();
        ensure!(
            trimmed.len() == Self::LEN && trimmed.bytes().all(|b| b.is_ascii_digit()),
            InvalidContactNumberSnafu { original: raw }
        );
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact numbers arrive as JSON numbers from older clients and as strings from newer ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawContactNumber {
    Number(u64),
    Text(String),
}

impl RawContactNumber {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for ContactNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawContactNumber::deserialize(deserializer)?.into_text();
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// Hobbies arrive either as a list or as one comma-joined string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHobbies {
    List(Vec<String>),
    Joined(String),
}

impl RawHobbies {
    pub fn into_list(self) -> Vec<String> {
        let items = match self {
            Self::List(items) => items,
            Self::Joined(joined) => joined.split(',').map(ToString::to_string).collect(),
        };
        items
            .into_iter()
            .map(|hobby| hobby.trim().to_string())
            .filter(|hobby| !hobby.is_empty())
            .collect()
    }
}

/// The body of `POST /students` and `PUT /students/{id}` before validation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<RawContactNumber>,
    pub gender: Option<String>,
    pub college_name: Option<String>,
    pub department: Option<String>,
    pub hobbies: Option<RawHobbies>,
    pub dob: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> RosterResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .context(MissingFieldSnafu { field })
}

impl StudentPayload {
    pub fn validate(self) -> RosterResult<StudentForm> {
        let first_name = required(self.first_name, "First name")?;
        let middle_name = required(self.middle_name, "Middle name")?;
        let last_name = required(self.last_name, "Last name")?;

        let email = required(self.email, "Email")?.to_lowercase();
        let email = EmailAddress::from_str(&email)
            .context(InvalidEmailSnafu { original: &email })?
            .as_str()
            .to_string();

        let contact_number = required(
            self.contact_number.map(RawContactNumber::into_text),
            "Contact number",
        )?;
        let contact_number = ContactNumber::parse(&contact_number)?;

        let gender = required(self.gender, "Gender")?.parse()?;
        let college_name = required(self.college_name, "College name")?;
        let department = required(self.department, "Department")?.parse()?;
        //the key must be sent, an empty list is fine
        let hobbies = self
            .hobbies
            .context(MissingFieldSnafu { field: "Hobbies" })?
            .into_list();
        let dob = required(self.dob, "Date of birth")?;

        Ok(StudentForm {
            first_name,
            middle_name,
            last_name,
            email,
            contact_number,
            gender,
            college_name,
            department,
            hobbies,
            dob,
        })
    }
}

/// Field values exactly as the HTML form posts them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentFormInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub hobbies: String,
    #[serde(default)]
    pub dob: String,
}

impl StudentFormInput {
    pub fn from_student(student: &Student) -> Self {
        Self {
            id: student.id.to_string(),
            first_name: student.first_name.clone(),
            middle_name: student.middle_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            contact_number: student.contact_number.to_string(),
            gender: student.gender.to_string(),
            college_name: student.college_name.clone(),
            department: student.department.to_string(),
            hobbies: student.hobbies_joined(),
            dob: student.dob.clone(),
        }
    }

    pub fn to_payload(&self) -> StudentPayload {
        StudentPayload {
            first_name: Some(self.first_name.clone()),
            middle_name: Some(self.middle_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            contact_number: Some(RawContactNumber::Text(self.contact_number.clone())),
            gender: Some(self.gender.clone()),
            college_name: Some(self.college_name.clone()),
            department: Some(self.department.clone()),
            hobbies: Some(RawHobbies::Joined(self.hobbies.clone())),
            dob: Some(self.dob.clone()),
        }
    }
}
