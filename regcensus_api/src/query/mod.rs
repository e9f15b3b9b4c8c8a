mod common;
pub use self::common::Query;

mod values;
pub use self::values::ValuesQuery;

mod lookup;
pub use self::lookup::{AgencyQuery, DataFinderQuery, DocumentTypeQuery, LabelQuery, VersionQuery};
