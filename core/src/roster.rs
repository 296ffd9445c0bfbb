// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::*;

/// One row of the personnel roster.
///
/// The header row names the columns; these are matched exactly as the
/// rosters are exported (`Name,Rank,Callsign,Position,Location,email,
/// password`). Columns beyond these are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RosterRecord {
    /// Full name; only the first two space-separated tokens are ever used.
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Rank")]
    pub rank: String,

    #[serde(rename = "Callsign")]
    pub callsign: String,

    #[serde(rename = "Position")]
    pub position: String,

    #[serde(rename = "Location")]
    pub location: String,

    /// Doubles as the username of the created account.
    pub email: String,

    /// Plaintext, used once for the reset-password call and then dropped.
    pub password: String,
}

/// Read a roster CSV from disk. A missing or unreadable file is
/// [`Error::FileRead`]; anything wrong inside it is [`Error::CsvParse`].
pub fn read_roster(path: &Path) -> Result<Vec<RosterRecord>, Error> {
    let file =
        File::open(path).map_err(|source| Error::file_read(path, source))?;

    parse_roster(file)
}

/// Parse roster CSV from any reader. The first row must be the header;
/// blank lines are skipped, which is the `csv` crate's native behavior.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterRecord>, Error> {
    let mut reader = csv::Reader::from_reader(reader);

    reader
        .deserialize()
        .collect::<Result<Vec<RosterRecord>, csv::Error>>()
        .map_err(Error::from)
}
