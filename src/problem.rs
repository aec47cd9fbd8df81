//! Problem definition and fitness evaluation.
//!
//! A placement problem is an immutable catalog of servers (capacity, cost)
//! and microservices (requirements). Candidate assignments are scored with a
//! penalty-function objective: the cost of every server that hosts at least
//! one microservice, plus a heavily weighted sum of CPU and RAM overflows.
//! Infeasible assignments are never rejected structurally; the penalty
//! weight makes any capacity violation dominate cost differences, so the
//! population drifts toward feasibility on its own.
//!
//! # Reference
//! Coello (2002), "Theoretical and numerical constraint-handling techniques
//! used with evolutionary algorithms: a survey"

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A server that can host microservices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Unique server name.
    pub name: String,
    /// Total CPU capacity (cores or abstract units).
    pub cpu_capacity: f64,
    /// Total RAM capacity (GB or abstract units).
    pub ram_capacity: f64,
    /// Cost incurred once if the server hosts anything at all.
    pub cost: f64,
}

impl Server {
    /// Creates a new server.
    pub fn new(name: impl Into<String>, cpu_capacity: f64, ram_capacity: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            cpu_capacity,
            ram_capacity,
            cost,
        }
    }
}

/// A microservice that must be hosted on exactly one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microservice {
    /// Unique microservice name.
    pub name: String,
    /// CPU demand, in the same units as [`Server::cpu_capacity`].
    pub cpu_requirement: f64,
    /// RAM demand, in the same units as [`Server::ram_capacity`].
    pub ram_requirement: f64,
}

impl Microservice {
    /// Creates a new microservice.
    pub fn new(name: impl Into<String>, cpu_requirement: f64, ram_requirement: f64) -> Self {
        Self {
            name: name.into(),
            cpu_requirement,
            ram_requirement,
        }
    }
}

/// An immutable placement problem instance.
///
/// Servers are indexed `0..server_count()`, microservices
/// `0..service_count()`; a chromosome's gene at position `i` is the server
/// index hosting microservice `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Server catalog, fixed for the lifetime of the problem.
    pub servers: Vec<Server>,
    /// Microservice catalog, fixed for the lifetime of the problem.
    pub microservices: Vec<Microservice>,
}

impl Problem {
    /// Creates a problem from server and microservice catalogs.
    pub fn new(servers: Vec<Server>, microservices: Vec<Microservice>) -> Self {
        Self {
            servers,
            microservices,
        }
    }

    /// Number of servers in the catalog.
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// Number of microservices in the catalog.
    pub fn service_count(&self) -> usize {
        self.microservices.len()
    }

    /// Validates the catalogs.
    ///
    /// Checks:
    /// 1. At least one server and one microservice
    /// 2. No duplicate names within either catalog
    /// 3. All capacities, requirements, and costs non-negative
    ///
    /// Returns `Err` with a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.servers.is_empty() {
            return Err("problem must define at least one server".into());
        }
        if self.microservices.is_empty() {
            return Err("problem must define at least one microservice".into());
        }
        let mut names = HashSet::new();
        for s in &self.servers {
            if !names.insert(s.name.as_str()) {
                return Err(format!("duplicate server name: {}", s.name));
            }
            if s.cpu_capacity < 0.0 || s.ram_capacity < 0.0 || s.cost < 0.0 {
                return Err(format!("server {} has a negative attribute", s.name));
            }
        }
        names.clear();
        for m in &self.microservices {
            if !names.insert(m.name.as_str()) {
                return Err(format!("duplicate microservice name: {}", m.name));
            }
            if m.cpu_requirement < 0.0 || m.ram_requirement < 0.0 {
                return Err(format!("microservice {} has a negative requirement", m.name));
            }
        }
        Ok(())
    }

    /// Total cost of servers that host at least one microservice.
    ///
    /// Each used server is counted once, regardless of how many
    /// microservices it hosts.
    pub fn used_cost(&self, genes: &[usize]) -> f64 {
        let mut used = vec![false; self.servers.len()];
        for &g in genes {
            used[g] = true;
        }
        self.servers
            .iter()
            .zip(&used)
            .filter(|(_, &u)| u)
            .map(|(s, _)| s.cost)
            .sum()
    }

    /// Total CPU overflow: per server, `max(0, assigned CPU - capacity)`.
    pub fn cpu_overflow(&self, genes: &[usize]) -> f64 {
        let mut loads = vec![0.0; self.servers.len()];
        for (i, &g) in genes.iter().enumerate() {
            loads[g] += self.microservices[i].cpu_requirement;
        }
        loads
            .iter()
            .zip(&self.servers)
            .map(|(&load, s)| (load - s.cpu_capacity).max(0.0))
            .sum()
    }

    /// Total RAM overflow: per server, `max(0, assigned RAM - capacity)`.
    pub fn ram_overflow(&self, genes: &[usize]) -> f64 {
        let mut loads = vec![0.0; self.servers.len()];
        for (i, &g) in genes.iter().enumerate() {
            loads[g] += self.microservices[i].ram_requirement;
        }
        loads
            .iter()
            .zip(&self.servers)
            .map(|(&load, s)| (load - s.ram_capacity).max(0.0))
            .sum()
    }

    /// Whether an assignment exceeds no server capacity.
    pub fn is_feasible(&self, genes: &[usize]) -> bool {
        self.cpu_overflow(genes) == 0.0 && self.ram_overflow(genes) == 0.0
    }

    /// Fitness of an assignment (lower is better).
    ///
    /// `used_cost + lambda * (cpu_overflow + ram_overflow)`. With a large
    /// `lambda`, any capacity violation outweighs any cost saving, so the
    /// minimum over feasible assignments is also the global minimum.
    ///
    /// Pure: depends only on `genes` and the catalogs.
    ///
    /// # Panics
    /// Panics if a gene is not a valid server index or `genes` is shorter
    /// or longer than the microservice catalog. Both are invariants the
    /// engine maintains; a violation is a programming defect.
    pub fn fitness(&self, genes: &[usize], lambda: f64) -> f64 {
        debug_assert_eq!(genes.len(), self.microservices.len());
        self.used_cost(genes) + lambda * (self.cpu_overflow(genes) + self.ram_overflow(genes))
    }
}
