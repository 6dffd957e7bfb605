//! Default mapping tables for the built-in formats.

use crate::field::SourceField;

type FieldTable = &'static [(SourceField, &'static str)];
type TypeTable = &'static [(&'static str, &'static str)];

const CSL_FIELDS: FieldTable = &[
    (SourceField::Title, "title"),
    (SourceField::Type, "type"),
    (SourceField::Keywords, "keyword"),
    (SourceField::Author, "author"),
    (SourceField::Abstract, "abstract"),
    (SourceField::FrenchAbstract, "abstract"),
    (SourceField::Year, "issued"),
    (SourceField::Date, "issued"),
    (SourceField::TertiaryTitle, "collection-title"),
    (SourceField::SecondaryTitle, "container-title"),
    (SourceField::Volume, "volume"),
    (SourceField::Edition, "edition"),
    (SourceField::Section, "section"),
    (SourceField::Issue, "issue"),
    (SourceField::NumberOfVolumes, "number-of-volumes"),
    (SourceField::Number, "number"),
    (SourceField::Pages, "page"),
    (SourceField::Publisher, "publisher"),
    (SourceField::PlacePublished, "publisher-place"),
    (SourceField::Issn, "ISSN"),
    (SourceField::Isbn, "ISBN"),
    (SourceField::CallNumber, "call-number"),
    (SourceField::Citekey, "citation-label"),
    (SourceField::Url, "URL"),
    (SourceField::Doi, "DOI"),
    (SourceField::Notes, "note"),
    (SourceField::OriginalPublication, "original-title"),
    (SourceField::AccessDate, "accessed"),
    (SourceField::ResearchNotes, "annote"),
    (SourceField::RemoteDbName, "archive"),
    (SourceField::RemoteDbProvider, "source"),
    (SourceField::TypeOfWork, "genre"),
    (SourceField::Refereed, "status"),
    (SourceField::ShortTitle, "title-short"),
    (SourceField::Pmid, "PMID"),
];

const CSL_TYPES: TypeTable = &[
    ("journal_article", "article-journal"),
    ("book", "book"),
    ("book_chapter", "chapter"),
    ("conference_paper", "paper-conference"),
    ("conference_proceedings", "paper-conference"),
    ("thesis", "thesis"),
    ("report", "report"),
    ("government_report", "report"),
    ("web_article", "webpage"),
    ("newspaper_article", "article-newspaper"),
    ("magazine_article", "article-magazine"),
    ("patent", "patent"),
    ("map", "map"),
    ("manuscript", "manuscript"),
    ("unpublished", "manuscript"),
    ("database", "dataset"),
    ("film", "motion_picture"),
    ("broadcast", "broadcast"),
    ("artwork", "graphic"),
    ("bill", "bill"),
    ("case", "legal_case"),
    ("statute", "legislation"),
    ("personal", "personal_communication"),
    ("presentation", "speech"),
    ("miscellaneous", "article"),
];

const BIBTEX_FIELDS: FieldTable = &[
    (SourceField::Type, "type"),
    (SourceField::Citekey, "citekey"),
    (SourceField::Author, "author"),
    (SourceField::Title, "title"),
    (SourceField::SecondaryTitle, "journal"),
    (SourceField::TertiaryTitle, "series"),
    (SourceField::Year, "year"),
    (SourceField::Volume, "volume"),
    (SourceField::Issue, "number"),
    (SourceField::Number, "number"),
    (SourceField::Pages, "pages"),
    (SourceField::Edition, "edition"),
    (SourceField::Section, "chapter"),
    (SourceField::Publisher, "publisher"),
    (SourceField::PlacePublished, "address"),
    (SourceField::Isbn, "isbn"),
    (SourceField::Issn, "issn"),
    (SourceField::Doi, "doi"),
    (SourceField::Url, "url"),
    (SourceField::Keywords, "keywords"),
    (SourceField::Abstract, "abstract"),
    (SourceField::Notes, "note"),
    (SourceField::ResearchNotes, "annote"),
    (SourceField::Language, "language"),
];

const BIBTEX_TYPES: TypeTable = &[
    ("journal_article", "article"),
    ("magazine_article", "article"),
    ("newspaper_article", "article"),
    ("book", "book"),
    ("book_chapter", "inbook"),
    ("conference_paper", "inproceedings"),
    ("conference_proceedings", "proceedings"),
    ("thesis", "phdthesis"),
    ("report", "techreport"),
    ("government_report", "techreport"),
    ("manuscript", "unpublished"),
    ("unpublished", "unpublished"),
    ("miscellaneous", "misc"),
];

const RIS_FIELDS: FieldTable = &[
    (SourceField::Type, "TY"),
    (SourceField::Title, "TI"),
    (SourceField::SecondaryTitle, "T2"),
    (SourceField::TertiaryTitle, "T3"),
    (SourceField::ShortTitle, "ST"),
    (SourceField::Author, "AU"),
    (SourceField::Keywords, "KW"),
    (SourceField::Abstract, "AB"),
    (SourceField::Year, "PY"),
    (SourceField::Date, "DA"),
    (SourceField::AccessDate, "Y2"),
    (SourceField::Volume, "VL"),
    (SourceField::Issue, "IS"),
    (SourceField::Pages, "SP"),
    (SourceField::Edition, "ET"),
    (SourceField::NumberOfVolumes, "NV"),
    (SourceField::Section, "SE"),
    (SourceField::Publisher, "PB"),
    (SourceField::PlacePublished, "CY"),
    (SourceField::Isbn, "SN"),
    (SourceField::Issn, "SN"),
    (SourceField::Url, "UR"),
    (SourceField::Doi, "DO"),
    (SourceField::Notes, "N1"),
    (SourceField::Language, "LA"),
    (SourceField::CallNumber, "CN"),
    (SourceField::AccessionNumber, "AN"),
    (SourceField::Label, "LB"),
    (SourceField::RemoteDbName, "DB"),
    (SourceField::RemoteDbProvider, "DP"),
    (SourceField::TypeOfWork, "M3"),
    (SourceField::OriginalPublication, "OP"),
    (SourceField::AuthorAddress, "AD"),
];

const RIS_TYPES: TypeTable = &[
    ("journal_article", "JOUR"),
    ("book", "BOOK"),
    ("book_chapter", "CHAP"),
    ("conference_paper", "CPAPER"),
    ("conference_proceedings", "CONF"),
    ("thesis", "THES"),
    ("report", "RPRT"),
    ("government_report", "RPRT"),
    ("web_article", "ELEC"),
    ("newspaper_article", "NEWS"),
    ("magazine_article", "MGZN"),
    ("patent", "PAT"),
    ("map", "MAP"),
    ("manuscript", "UNPB"),
    ("unpublished", "UNPB"),
    ("database", "DATA"),
    ("film", "MPCT"),
    ("broadcast", "VIDEO"),
    ("bill", "BILL"),
    ("case", "CASE"),
    ("statute", "STAT"),
    ("personal", "PCOMM"),
    ("software", "COMP"),
    ("miscellaneous", "GEN"),
];

const ENDNOTE_FIELDS: FieldTable = &[
    (SourceField::Type, "ref-type"),
    (SourceField::Author, "author"),
    (SourceField::Title, "title"),
    (SourceField::SecondaryTitle, "secondary-title"),
    (SourceField::TertiaryTitle, "tertiary-title"),
    (SourceField::ShortTitle, "short-title"),
    (SourceField::AlternateTitle, "alt-title"),
    (SourceField::TranslatedTitle, "translated-title"),
    (SourceField::Keywords, "keyword"),
    (SourceField::Year, "year"),
    (SourceField::Date, "pub-dates"),
    (SourceField::Volume, "volume"),
    (SourceField::Issue, "number"),
    (SourceField::Pages, "pages"),
    (SourceField::Edition, "edition"),
    (SourceField::Section, "section"),
    (SourceField::NumberOfVolumes, "num-vols"),
    (SourceField::Publisher, "publisher"),
    (SourceField::PlacePublished, "pub-location"),
    (SourceField::Isbn, "isbn"),
    (SourceField::AccessionNumber, "accession-num"),
    (SourceField::CallNumber, "call-num"),
    (SourceField::Label, "label"),
    (SourceField::TypeOfWork, "work-type"),
    (SourceField::Url, "url"),
    (SourceField::Doi, "electronic-resource-num"),
    (SourceField::Abstract, "abstract"),
    (SourceField::Notes, "notes"),
    (SourceField::ResearchNotes, "research-notes"),
    (SourceField::Language, "language"),
    (SourceField::RemoteDbName, "remote-database-name"),
    (SourceField::RemoteDbProvider, "remote-database-provider"),
    (SourceField::AuthorAddress, "auth-address"),
    (SourceField::ReprintEdition, "reprint-edition"),
    (SourceField::OriginalPublication, "orig-pub"),
    (SourceField::Custom1, "custom1"),
    (SourceField::Custom2, "custom2"),
    (SourceField::Custom3, "custom3"),
    (SourceField::Custom4, "custom4"),
    (SourceField::Custom5, "custom5"),
    (SourceField::Custom6, "custom6"),
    (SourceField::Custom7, "custom7"),
];

const ENDNOTE_TYPES: TypeTable = &[
    ("journal_article", "Journal Article"),
    ("book", "Book"),
    ("book_chapter", "Book Section"),
    ("conference_paper", "Conference Paper"),
    ("conference_proceedings", "Conference Proceedings"),
    ("thesis", "Thesis"),
    ("report", "Report"),
    ("government_report", "Report"),
    ("web_article", "Web Page"),
    ("newspaper_article", "Newspaper Article"),
    ("magazine_article", "Magazine Article"),
    ("patent", "Patent"),
    ("map", "Map"),
    ("manuscript", "Manuscript"),
    ("database", "Dataset"),
    ("film", "Film or Broadcast"),
    ("broadcast", "Film or Broadcast"),
    ("personal", "Personal Communication"),
    ("statute", "Statute"),
    ("bill", "Bill"),
    ("case", "Case"),
    ("unpublished", "Unpublished Work"),
    ("miscellaneous", "Generic"),
];

const CSV_FIELDS: FieldTable = &[
    (SourceField::Type, "type"),
    (SourceField::Title, "title"),
    (SourceField::Author, "author"),
    (SourceField::Year, "year"),
    (SourceField::Date, "date"),
    (SourceField::SecondaryTitle, "journal"),
    (SourceField::Volume, "volume"),
    (SourceField::Issue, "issue"),
    (SourceField::Pages, "pages"),
    (SourceField::Edition, "edition"),
    (SourceField::Publisher, "publisher"),
    (SourceField::PlacePublished, "place"),
    (SourceField::Isbn, "isbn"),
    (SourceField::Issn, "issn"),
    (SourceField::Doi, "doi"),
    (SourceField::Url, "url"),
    (SourceField::Keywords, "keywords"),
    (SourceField::Abstract, "abstract"),
    (SourceField::Language, "language"),
    (SourceField::Notes, "notes"),
];

/// Field and type tables for a built-in format id; empty for anything else.
pub(super) fn tables(format_id: &str) -> (FieldTable, TypeTable) {
    match format_id {
        "csl" => (CSL_FIELDS, CSL_TYPES),
        "bibtex" => (BIBTEX_FIELDS, BIBTEX_TYPES),
        "ris" => (RIS_FIELDS, RIS_TYPES),
        "endnote7xml" => (ENDNOTE_FIELDS, ENDNOTE_TYPES),
        "csv" => (CSV_FIELDS, &[]),
        _ => (&[], &[]),
    }
}
