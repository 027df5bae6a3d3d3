//! IRIs of the vocabulary terms the quality checks look at.

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod dcat {
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    pub const DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#Distribution";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    pub const ACCESS_URL: &str = "http://www.w3.org/ns/dcat#accessURL";
    pub const DOWNLOAD_URL: &str = "http://www.w3.org/ns/dcat#downloadURL";
    pub const MEDIA_TYPE: &str = "http://www.w3.org/ns/dcat#mediaType";
    pub const BYTE_SIZE: &str = "http://www.w3.org/ns/dcat#byteSize";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
}

pub mod dct {
    pub const SPATIAL: &str = "http://purl.org/dc/terms/spatial";
    pub const TEMPORAL: &str = "http://purl.org/dc/terms/temporal";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    pub const ACCESS_RIGHTS: &str = "http://purl.org/dc/terms/accessRights";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const RIGHTS: &str = "http://purl.org/dc/terms/rights";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
}
