// Lecture de la configuration de démarrage : hostname, topologie statique,
// et intervalles ajustables par variable d'environnement.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::types::RouterId;

#[derive(Debug, Clone)]
pub struct Settings {
    pub router_id: RouterId,
    pub control_port: u16,
    pub hello_interval_secs: u64,
    pub lsa_interval_secs: u64,
}

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HELLO_INTERVAL: u64 = 10;
const DEFAULT_LSA_INTERVAL: u64 = 30;

impl Settings {
    /// Derives the RouterId from the machine hostname (overridable via
    /// `OSPFD_ROUTER_ID`, e.g. for running several routers on one host in
    /// tests) and reads the tunable intervals from environment variables,
    /// falling back to the spec's defaults.
    pub fn from_env() -> Result<Self> {
        let router_id = match std::env::var("OSPFD_ROUTER_ID") {
            Ok(id) if !id.trim().is_empty() => RouterId::from(id),
            _ => {
                let name = hostname::get()
                    .map_err(|e| AppError::ConfigError(format!("cannot read hostname: {}", e)))?;
                let name = name
                    .into_string()
                    .map_err(|_| AppError::ConfigError("hostname is not valid UTF-8".to_string()))?;
                RouterId::from(name)
            }
        };

        let control_port = env_override("OSPFD_PORT", DEFAULT_PORT)?;
        let hello_interval_secs = env_override("OSPFD_HELLO_INTERVAL", DEFAULT_HELLO_INTERVAL)?;
        let lsa_interval_secs = env_override("OSPFD_LSA_INTERVAL", DEFAULT_LSA_INTERVAL)?;

        Ok(Settings {
            router_id,
            control_port,
            hello_interval_secs,
            lsa_interval_secs,
        })
    }
}

fn env_override<T: std::str::FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::ConfigError(format!("invalid value for {}: {:?}", var, raw))),
    }
}

/// One undirected edge from `conex_rede.csv` (§6): `Origem,Destino,Custo`.
/// `Custo` of `-` means cost 1 (host-to-router edges).
#[derive(Debug, Clone, serde::Deserialize)]
struct TopologyRow {
    #[serde(rename = "Origem")]
    origem: String,
    #[serde(rename = "Destino")]
    destino: String,
    #[serde(rename = "Custo")]
    custo: String,
}

/// The static, whole-network topology as declared by `conex_rede.csv`.
/// Used to authenticate HELLO origins and to look up link costs — the
/// LSDB never invents a cost, it only ever reports what this file says.
#[derive(Debug, Clone, Default)]
pub struct StaticTopology {
    /// adjacency[a][b] = cost, populated symmetrically for each CSV row.
    adjacency: HashMap<RouterId, HashMap<RouterId, u32>>,
}

impl StaticTopology {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::ConfigError(format!("cannot read topology file {}: {}", path.display(), e))
        })?;

        let mut topology = StaticTopology::default();
        for row in reader.deserialize() {
            let row: TopologyRow = row?;
            let cost = if row.custo.trim() == "-" {
                1
            } else {
                row.custo.trim().parse::<u32>().map_err(|_| {
                    AppError::ConfigError(format!(
                        "invalid Custo value {:?} for edge {}-{}",
                        row.custo, row.origem, row.destino
                    ))
                })?
            };
            topology.add_edge(RouterId::from(row.origem), RouterId::from(row.destino), cost);
        }
        Ok(topology)
    }

    fn add_edge(&mut self, a: RouterId, b: RouterId, cost: u32) {
        self.adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), cost);
        self.adjacency.entry(b).or_default().insert(a, cost);
    }

    /// Cost of the edge `(a, b)` if the static topology declares one.
    pub fn cost_between(&self, a: &RouterId, b: &RouterId) -> Option<u32> {
        self.adjacency.get(a).and_then(|m| m.get(b)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile_path::TempCsv {
        tempfile_path::TempCsv::new(contents)
    }

    // Minimal scratch-file helper: avoids pulling in a dev-dependency just
    // to write one temp file for this test module.
    mod tempfile_path {
        use super::*;
        use std::fs;

        pub struct TempCsv {
            pub path: std::path::PathBuf,
        }

        impl TempCsv {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!(
                    "conex_rede_test_{}_{}.csv",
                    std::process::id(),
                    crate::types::now()
                ));
                let mut file = fs::File::create(&path).unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                TempCsv { path }
            }
        }

        impl Drop for TempCsv {
            fn drop(&mut self) {
                let _ = fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn parses_dash_cost_as_one() {
        let tmp = write_csv("Origem,Destino,Custo\nrouter0,router1,-\n");
        let topo = StaticTopology::load(&tmp.path).unwrap();
        assert_eq!(
            topo.cost_between(&RouterId::from("router0"), &RouterId::from("router1")),
            Some(1)
        );
        // symmetric
        assert_eq!(
            topo.cost_between(&RouterId::from("router1"), &RouterId::from("router0")),
            Some(1)
        );
    }

    #[test]
    fn parses_numeric_cost() {
        let tmp = write_csv("Origem,Destino,Custo\nrouter0,router1,5\n");
        let topo = StaticTopology::load(&tmp.path).unwrap();
        assert_eq!(
            topo.cost_between(&RouterId::from("router0"), &RouterId::from("router1")),
            Some(5)
        );
    }

    #[test]
    fn unknown_edge_has_no_cost() {
        let tmp = write_csv("Origem,Destino,Custo\nrouter0,router1,5\n");
        let topo = StaticTopology::load(&tmp.path).unwrap();
        assert_eq!(topo.cost_between(&RouterId::from("router0"), &RouterId::from("router2")), None);
    }
}
