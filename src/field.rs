//! Bibliography entity fields.
//!
//! Defines every base field of the Bibliography entity together with its
//! machine name, human label and declared value shape.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Shape a source field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Single string value (plain or long text).
    Text,
    /// Single integer value.
    Integer,
    /// Unlimited cardinality: an ordered list of scalar or compound values.
    Sequence,
}

impl FieldShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldShape::Text => "text",
            FieldShape::Integer => "integer",
            FieldShape::Sequence => "list",
        }
    }
}

/// Fields of the Bibliography entity.
///
/// `Unknown` carries any field name storage delivers that is not part of the
/// entity model. Unknown fields can never be mapped and are dropped during
/// normalization.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceField {
    Type,
    Title,
    Author,
    Keywords,
    Abstract,
    FrenchAbstract,
    Notes,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Custom6,
    Custom7,
    AuthorAddress,
    Year,
    SecondaryTitle,
    Volume,
    Edition,
    Section,
    Issue,
    NumberOfVolumes,
    Number,
    Pages,
    Date,
    TypeOfWork,
    Language,
    ReprintEdition,
    Publisher,
    PlacePublished,
    Issn,
    Isbn,
    AccessionNumber,
    CallNumber,
    OtherNumber,
    Citekey,
    Url,
    Doi,
    ResearchNotes,
    TertiaryTitle,
    ShortTitle,
    AlternateTitle,
    TranslatedTitle,
    OriginalPublication,
    OtherAuthorAffiliations,
    RemoteDbName,
    RemoteDbProvider,
    Label,
    AccessDate,
    Refereed,
    Pmid,
    Created,
    Changed,
    Unknown(String),
}

impl SourceField {
    /// Every known field, in entity declaration order.
    pub const ALL: [SourceField; 53] = [
        SourceField::Type,
        SourceField::Title,
        SourceField::Author,
        SourceField::Keywords,
        SourceField::Abstract,
        SourceField::FrenchAbstract,
        SourceField::Notes,
        SourceField::Custom1,
        SourceField::Custom2,
        SourceField::Custom3,
        SourceField::Custom4,
        SourceField::Custom5,
        SourceField::Custom6,
        SourceField::Custom7,
        SourceField::AuthorAddress,
        SourceField::Year,
        SourceField::SecondaryTitle,
        SourceField::Volume,
        SourceField::Edition,
        SourceField::Section,
        SourceField::Issue,
        SourceField::NumberOfVolumes,
        SourceField::Number,
        SourceField::Pages,
        SourceField::Date,
        SourceField::TypeOfWork,
        SourceField::Language,
        SourceField::ReprintEdition,
        SourceField::Publisher,
        SourceField::PlacePublished,
        SourceField::Issn,
        SourceField::Isbn,
        SourceField::AccessionNumber,
        SourceField::CallNumber,
        SourceField::OtherNumber,
        SourceField::Citekey,
        SourceField::Url,
        SourceField::Doi,
        SourceField::ResearchNotes,
        SourceField::TertiaryTitle,
        SourceField::ShortTitle,
        SourceField::AlternateTitle,
        SourceField::TranslatedTitle,
        SourceField::OriginalPublication,
        SourceField::OtherAuthorAffiliations,
        SourceField::RemoteDbName,
        SourceField::RemoteDbProvider,
        SourceField::Label,
        SourceField::AccessDate,
        SourceField::Refereed,
        SourceField::Pmid,
        SourceField::Created,
        SourceField::Changed,
    ];

    /// Convert a machine name to a field.
    pub fn from_name(name: &str) -> Self {
        match name {
            "type" => SourceField::Type,
            "title" => SourceField::Title,
            "author" => SourceField::Author,
            "keywords" => SourceField::Keywords,
            "bibcite_abst_e" => SourceField::Abstract,
            "bibcite_abst_f" => SourceField::FrenchAbstract,
            "bibcite_notes" => SourceField::Notes,
            "bibcite_custom1" => SourceField::Custom1,
            "bibcite_custom2" => SourceField::Custom2,
            "bibcite_custom3" => SourceField::Custom3,
            "bibcite_custom4" => SourceField::Custom4,
            "bibcite_custom5" => SourceField::Custom5,
            "bibcite_custom6" => SourceField::Custom6,
            "bibcite_custom7" => SourceField::Custom7,
            "bibcite_auth_address" => SourceField::AuthorAddress,
            "bibcite_year" => SourceField::Year,
            "bibcite_secondary_title" => SourceField::SecondaryTitle,
            "bibcite_volume" => SourceField::Volume,
            "bibcite_edition" => SourceField::Edition,
            "bibcite_section" => SourceField::Section,
            "bibcite_issue" => SourceField::Issue,
            "bibcite_number_of_volumes" => SourceField::NumberOfVolumes,
            "bibcite_number" => SourceField::Number,
            "bibcite_pages" => SourceField::Pages,
            "bibcite_date" => SourceField::Date,
            "bibcite_type_of_work" => SourceField::TypeOfWork,
            "bibcite_lang" => SourceField::Language,
            "bibcite_reprint_edition" => SourceField::ReprintEdition,
            "bibcite_publisher" => SourceField::Publisher,
            "bibcite_place_published" => SourceField::PlacePublished,
            "bibcite_issn" => SourceField::Issn,
            "bibcite_isbn" => SourceField::Isbn,
            "bibcite_accession_number" => SourceField::AccessionNumber,
            "bibcite_call_number" => SourceField::CallNumber,
            "bibcite_other_number" => SourceField::OtherNumber,
            "bibcite_citekey" => SourceField::Citekey,
            "bibcite_url" => SourceField::Url,
            "bibcite_doi" => SourceField::Doi,
            "bibcite_research_notes" => SourceField::ResearchNotes,
            "bibcite_tertiary_title" => SourceField::TertiaryTitle,
            "bibcite_short_title" => SourceField::ShortTitle,
            "bibcite_alternate_title" => SourceField::AlternateTitle,
            "bibcite_translated_title" => SourceField::TranslatedTitle,
            "bibcite_original_publication" => SourceField::OriginalPublication,
            "bibcite_other_author_affiliations" => SourceField::OtherAuthorAffiliations,
            "bibcite_remote_db_name" => SourceField::RemoteDbName,
            "bibcite_remote_db_provider" => SourceField::RemoteDbProvider,
            "bibcite_label" => SourceField::Label,
            "bibcite_access_date" => SourceField::AccessDate,
            "bibcite_refereed" => SourceField::Refereed,
            "bibcite_pmid" => SourceField::Pmid,
            "created" => SourceField::Created,
            "changed" => SourceField::Changed,
            _ => SourceField::Unknown(name.to_string()),
        }
    }

    /// Machine name of the field.
    pub fn as_name(&self) -> &str {
        match self {
            SourceField::Type => "type",
            SourceField::Title => "title",
            SourceField::Author => "author",
            SourceField::Keywords => "keywords",
            SourceField::Abstract => "bibcite_abst_e",
            SourceField::FrenchAbstract => "bibcite_abst_f",
            SourceField::Notes => "bibcite_notes",
            SourceField::Custom1 => "bibcite_custom1",
            SourceField::Custom2 => "bibcite_custom2",
            SourceField::Custom3 => "bibcite_custom3",
            SourceField::Custom4 => "bibcite_custom4",
            SourceField::Custom5 => "bibcite_custom5",
            SourceField::Custom6 => "bibcite_custom6",
            SourceField::Custom7 => "bibcite_custom7",
            SourceField::AuthorAddress => "bibcite_auth_address",
            SourceField::Year => "bibcite_year",
            SourceField::SecondaryTitle => "bibcite_secondary_title",
            SourceField::Volume => "bibcite_volume",
            SourceField::Edition => "bibcite_edition",
            SourceField::Section => "bibcite_section",
            SourceField::Issue => "bibcite_issue",
            SourceField::NumberOfVolumes => "bibcite_number_of_volumes",
            SourceField::Number => "bibcite_number",
            SourceField::Pages => "bibcite_pages",
            SourceField::Date => "bibcite_date",
            SourceField::TypeOfWork => "bibcite_type_of_work",
            SourceField::Language => "bibcite_lang",
            SourceField::ReprintEdition => "bibcite_reprint_edition",
            SourceField::Publisher => "bibcite_publisher",
            SourceField::PlacePublished => "bibcite_place_published",
            SourceField::Issn => "bibcite_issn",
            SourceField::Isbn => "bibcite_isbn",
            SourceField::AccessionNumber => "bibcite_accession_number",
            SourceField::CallNumber => "bibcite_call_number",
            SourceField::OtherNumber => "bibcite_other_number",
            SourceField::Citekey => "bibcite_citekey",
            SourceField::Url => "bibcite_url",
            SourceField::Doi => "bibcite_doi",
            SourceField::ResearchNotes => "bibcite_research_notes",
            SourceField::TertiaryTitle => "bibcite_tertiary_title",
            SourceField::ShortTitle => "bibcite_short_title",
            SourceField::AlternateTitle => "bibcite_alternate_title",
            SourceField::TranslatedTitle => "bibcite_translated_title",
            SourceField::OriginalPublication => "bibcite_original_publication",
            SourceField::OtherAuthorAffiliations => "bibcite_other_author_affiliations",
            SourceField::RemoteDbName => "bibcite_remote_db_name",
            SourceField::RemoteDbProvider => "bibcite_remote_db_provider",
            SourceField::Label => "bibcite_label",
            SourceField::AccessDate => "bibcite_access_date",
            SourceField::Refereed => "bibcite_refereed",
            SourceField::Pmid => "bibcite_pmid",
            SourceField::Created => "created",
            SourceField::Changed => "changed",
            SourceField::Unknown(name) => name,
        }
    }

    /// Human readable label, as shown on entity forms.
    pub fn label(&self) -> &str {
        match self {
            SourceField::Type => "Type",
            SourceField::Title => "Title",
            SourceField::Author => "Author",
            SourceField::Keywords => "Keywords",
            SourceField::Abstract => "Abstract",
            SourceField::FrenchAbstract => "French Abstract",
            SourceField::Notes => "Notes",
            SourceField::Custom1 => "Custom 1",
            SourceField::Custom2 => "Custom 2",
            SourceField::Custom3 => "Custom 3",
            SourceField::Custom4 => "Custom 4",
            SourceField::Custom5 => "Custom 5",
            SourceField::Custom6 => "Custom 6",
            SourceField::Custom7 => "Custom 7",
            SourceField::AuthorAddress => "Author Address",
            SourceField::Year => "Year of Publication",
            SourceField::SecondaryTitle => "Secondary Title",
            SourceField::Volume => "Volume",
            SourceField::Edition => "Edition",
            SourceField::Section => "Section",
            SourceField::Issue => "Issue",
            SourceField::NumberOfVolumes => "Number of Volumes",
            SourceField::Number => "Number",
            SourceField::Pages => "Pagination",
            SourceField::Date => "Date Published",
            SourceField::TypeOfWork => "Type of Work",
            SourceField::Language => "Publication Language",
            SourceField::ReprintEdition => "Reprint Edition",
            SourceField::Publisher => "Publisher",
            SourceField::PlacePublished => "Place Published",
            SourceField::Issn => "ISSN Number",
            SourceField::Isbn => "ISBN Number",
            SourceField::AccessionNumber => "Accession Number",
            SourceField::CallNumber => "Call Number",
            SourceField::OtherNumber => "Other Numbers",
            SourceField::Citekey => "Citation Key",
            SourceField::Url => "URL",
            SourceField::Doi => "DOI",
            SourceField::ResearchNotes => "Research Notes",
            SourceField::TertiaryTitle => "Tertiary Title",
            SourceField::ShortTitle => "Short Title",
            SourceField::AlternateTitle => "Alternate Title",
            SourceField::TranslatedTitle => "Translated Title",
            SourceField::OriginalPublication => "Original Publication",
            SourceField::OtherAuthorAffiliations => "Other Author Affiliations",
            SourceField::RemoteDbName => "Remote Database Name",
            SourceField::RemoteDbProvider => "Remote Database Provider",
            SourceField::Label => "Label",
            SourceField::AccessDate => "Access Date",
            SourceField::Refereed => "Refereed Designation",
            SourceField::Pmid => "PMID",
            SourceField::Created => "Created",
            SourceField::Changed => "Changed",
            SourceField::Unknown(name) => name,
        }
    }

    /// Declared value shape, `None` for unknown fields.
    pub fn shape(&self) -> Option<FieldShape> {
        match self {
            SourceField::Author | SourceField::Keywords => Some(FieldShape::Sequence),
            SourceField::Year | SourceField::Created | SourceField::Changed => {
                Some(FieldShape::Integer)
            }
            SourceField::Unknown(_) => None,
            _ => Some(FieldShape::Text),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SourceField::Unknown(_))
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_name())
    }
}

impl From<&str> for SourceField {
    fn from(name: &str) -> Self {
        SourceField::from_name(name)
    }
}

impl Serialize for SourceField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_name())
    }
}

impl<'de> Deserialize<'de> for SourceField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(SourceField::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("title", SourceField::Title)]
    #[case("bibcite_year", SourceField::Year)]
    #[case("bibcite_abst_e", SourceField::Abstract)]
    #[case("bibcite_pmid", SourceField::Pmid)]
    #[case("nid", SourceField::Unknown("nid".to_string()))]
    fn test_from_name(#[case] input: &str, #[case] expected: SourceField) {
        assert_eq!(SourceField::from_name(input), expected);
    }

    #[test]
    fn test_names_round_trip_for_all_fields() {
        for field in SourceField::ALL.iter() {
            assert_eq!(&SourceField::from_name(field.as_name()), field);
            assert!(field.is_known());
        }
    }

    #[rstest]
    #[case(SourceField::Author, Some(FieldShape::Sequence))]
    #[case(SourceField::Keywords, Some(FieldShape::Sequence))]
    #[case(SourceField::Year, Some(FieldShape::Integer))]
    #[case(SourceField::Pages, Some(FieldShape::Text))]
    #[case(SourceField::Unknown("x".into()), None)]
    fn test_shape(#[case] field: SourceField, #[case] expected: Option<FieldShape>) {
        assert_eq!(field.shape(), expected);
    }

    #[test]
    fn test_label() {
        assert_eq!(SourceField::Year.label(), "Year of Publication");
        assert_eq!(SourceField::Pages.label(), "Pagination");
    }
}
