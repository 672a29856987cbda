//! DNS lookups used to explain certificate issuance failures.

use std::net::{IpAddr, ToSocketAddrs};
use std::rc::Rc;

use crate::application::ports::{CommandRunner, DnsDiagnostics};
use crate::domain::config::AccountConfig;

pub struct SystemDns {
    public_ip: Option<String>,
    nameservers: Vec<String>,
    runner: Rc<dyn CommandRunner>,
}

impl SystemDns {
    #[must_use]
    pub fn new(account: &AccountConfig, runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            public_ip: account.public_ip.clone(),
            nameservers: account.nameservers.clone(),
            runner,
        }
    }
}

impl DnsDiagnostics for SystemDns {
    fn public_ip(&self) -> Option<String> {
        self.public_ip.clone()
    }

    fn resolve(&self, hostname: &str) -> Option<IpAddr> {
        (hostname, 0)
            .to_socket_addrs()
            .ok()?
            .map(|addr| addr.ip())
            .find(IpAddr::is_ipv4)
    }

    fn hosting_nameservers(&self, _domain: &str) -> Vec<String> {
        self.nameservers.clone()
    }

    fn authoritative_nameservers(&self, hostname: &str) -> Vec<String> {
        match self.runner.run("dig", &["+short", "NS", hostname]) {
            Ok(out) if out.status.success() => parse_ns(&String::from_utf8_lossy(&out.stdout)),
            Ok(_) | Err(_) => {
                tracing::debug!(hostname, "nameserver lookup failed");
                Vec::new()
            }
        }
    }
}

fn parse_ns(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|l| l.trim().trim_end_matches('.'))
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase)
        .collect()
}
