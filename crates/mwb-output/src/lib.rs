//! Output generation for canonical tables.
//!
//! - **download**: CSV text wrapped in a base64 `data:` URI download link
//! - **frame**: Polars DataFrame conversion and delimited file writing

mod download;
mod error;
mod frame;

pub use download::{DEFAULT_FILENAME, DEFAULT_TITLE, DownloadLink, encode_table, table_to_csv};
pub use error::{OutputError, Result};
pub use frame::{to_dataframe, write_delimited};
