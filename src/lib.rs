/*!
Checks CSV exports from a packet-capture pipeline against the fixed ten-column layout expected by
the downstream analytics import: header, timestamp format, IP and port syntax, packet lengths.

```no_run
use capture_csv_check::Validator;

let report = Validator::new().validate_path("output/captured_packets.csv").unwrap();
println!("{}", report);
assert!(report.is_success());
```
*/

pub mod error;
pub use error::{Result, ValidateError};

pub mod encoding;
pub use encoding::Encoding;

pub mod field;

pub mod schema;
pub use schema::{Column, PacketRow, EXPECTED_HEADER};

pub mod report;
pub use report::{HeaderCheck, IssueKind, ProtocolTally, Report, ReportDisplay, ValidationIssue};

mod validator;
pub use validator::{validate, validate_with, Validator};
