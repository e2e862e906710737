/*!
Loads CAIDA's `as-org2info.txt` AS-to-organization-to-country mapping,
used to annotate a looked-up origin AS with the country its registering
organization is in.

The file has two pipe-delimited sections, each introduced by a comment
line: `org_id|changed|name|country|source` rows mapping an organization
to a country, followed by `aut|changed|as_name|org_id|source` rows
mapping an AS number to one of those organizations. The second section
depends on the first already being fully parsed, which holds for every
real CAIDA release (orgs are listed before ASes) and is not re-verified
here beyond skipping AS rows whose org id doesn't resolve.
*/
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const FORMAT1_HEADER: &str = "# format:org_id";
const FORMAT2_HEADER: &str = "# format:aut";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsOrgInfo {
    pub asn: u32,
    pub as_name: String,
    pub org_id: String,
    pub country: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrgInfoTable {
    ases: HashMap<u32, AsOrgInfo>,
    countries: HashMap<String, Vec<u32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Orgs,
    Ases,
}

impl OrgInfoTable {
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let reader = crate::io::open_source(path)?;
        Ok(Self::parse(reader))
    }

    pub fn parse(reader: impl Read) -> Self {
        let mut orgs: HashMap<String, String> = HashMap::new();
        let mut ases = HashMap::new();
        let mut countries: HashMap<String, Vec<u32>> = HashMap::new();
        let mut section = Section::None;

        for line in BufReader::new(reader).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("stopping as-org2info parse: {}", e);
                    break;
                }
            };

            if line.starts_with(FORMAT1_HEADER) {
                section = Section::Orgs;
                continue;
            }
            if line.starts_with(FORMAT2_HEADER) {
                section = Section::Ases;
                continue;
            }

            match section {
                Section::None => {}
                Section::Orgs => parse_org_line(&line, &mut orgs),
                Section::Ases => parse_as_line(&line, &orgs, &mut ases, &mut countries),
            }
        }

        OrgInfoTable { ases, countries }
    }

    pub fn get(&self, asn: u32) -> Option<&AsOrgInfo> {
        self.ases.get(&asn)
    }

    pub fn country_for_asn(&self, asn: u32) -> Option<&str> {
        self.ases.get(&asn).map(|info| info.country.as_str())
    }

    pub fn ases_for_country(&self, country: &str) -> &[u32] {
        self.countries
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn parse_org_line(line: &str, orgs: &mut HashMap<String, String>) {
    let fields: Vec<&str> = line.trim().split('|').collect();
    if fields.len() != 5 {
        log::warn!("skipping malformed as-org2info org line: {}", line);
        return;
    }
    let [org_id, _changed, _name, country, _source] = [fields[0], fields[1], fields[2], fields[3], fields[4]];
    orgs.insert(org_id.to_string(), country.to_string());
}

fn parse_as_line(
    line: &str,
    orgs: &HashMap<String, String>,
    ases: &mut HashMap<u32, AsOrgInfo>,
    countries: &mut HashMap<String, Vec<u32>>,
) {
    let fields: Vec<&str> = line.trim().split('|').collect();
    if fields.len() != 5 {
        log::warn!("skipping malformed as-org2info AS line: {}", line);
        return;
    }
    let (asn_str, _changed, as_name, org_id, _source) =
        (fields[0], fields[1], fields[2], fields[3], fields[4]);

    let asn: u32 = match asn_str.parse() {
        Ok(asn) => asn,
        Err(_) => {
            log::warn!("skipping as-org2info AS line with non-numeric ASN: {}", line);
            return;
        }
    };

    let Some(country) = orgs.get(org_id) else {
        log::warn!(
            "skipping AS {} with unresolved org id {}",
            asn,
            org_id
        );
        return;
    };

    ases.insert(
        asn,
        AsOrgInfo {
            asn,
            as_name: as_name.to_string(),
            org_id: org_id.to_string(),
            country: country.clone(),
        },
    );
    countries.entry(country.clone()).or_default().push(asn);
}
