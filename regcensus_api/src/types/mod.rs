mod payload;
pub use self::payload::{decode_payload, decode_records, error_message};

mod lookup;
pub use self::lookup::{
    AgencyRecord, ClusterRecord, DocumentTypeRecord, JurisdictionRecord, LabelRecord,
    SeriesRecord,
};

mod datafinder;
pub use self::datafinder::DataFinderRecord;

mod id;
