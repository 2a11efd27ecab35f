/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use copss_router::routing::MAX_ST_LIFETIME;
use copss_router::runtime::{
    secs_or_unlimited, NodeMode, RouterOptions, DEFAULT_CONTROL_PORT, DEFAULT_EVENT_QUEUE_SIZE,
    DEFAULT_RENDEZVOUS_PORT, DEFAULT_ROUTER_PORT,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config file: {0}")]
    Parse(#[from] json5::Error),
    #[error("router.st_expire_time_secs must be at most {max}, got {value}")]
    StExpireTimeTooLong { value: u64, max: u64 },
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub(crate) node: NodeConfig,
    pub(crate) router: RouterConfig,
    pub(crate) rendezvous: RendezvousConfig,
    pub(crate) tcp: TcpConfig,
    pub(crate) events: EventsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct NodeConfig {
    pub(crate) mode: NodeModeConfig,
    pub(crate) listen_ip: IpAddr,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            mode: NodeModeConfig::default(),
            listen_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeModeConfig {
    #[default]
    Router,
    Rendezvous,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct RouterConfig {
    pub(crate) port: u16,
    pub(crate) control_port: u16,
    /// Subscription lifetime; 0 keeps subscriptions until their face goes away.
    pub(crate) st_expire_time_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_ROUTER_PORT,
            control_port: DEFAULT_CONTROL_PORT,
            st_expire_time_secs: 0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct RendezvousConfig {
    pub(crate) port: u16,
}

impl Default for RendezvousConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_RENDEZVOUS_PORT,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields, default)]
pub struct TcpConfig {
    pub(crate) connection_timeout_secs: u64,
    pub(crate) receive_timeout_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct EventsConfig {
    pub(crate) queue_size: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_EVENT_QUEUE_SIZE,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(contents)?)
    }

    pub fn router_options(&self) -> Result<RouterOptions, ConfigError> {
        let max = MAX_ST_LIFETIME.as_secs();
        if self.router.st_expire_time_secs > max {
            return Err(ConfigError::StExpireTimeTooLong {
                value: self.router.st_expire_time_secs,
                max,
            });
        }

        let ip = self.node.listen_ip;
        let mut options = match self.node.mode {
            NodeModeConfig::Router => RouterOptions::router(
                SocketAddr::new(ip, self.router.port),
                SocketAddr::new(ip, self.router.control_port),
            ),
            NodeModeConfig::Rendezvous => {
                RouterOptions::rendezvous(SocketAddr::new(ip, self.rendezvous.port))
            }
        };
        if options.mode == NodeMode::Router {
            options.st_lifetime = secs_or_unlimited(self.router.st_expire_time_secs);
        }
        options.connection_timeout = secs_or_unlimited(self.tcp.connection_timeout_secs);
        options.receive_timeout = secs_or_unlimited(self.tcp.receive_timeout_secs);
        options.event_queue_size = self.events.queue_size;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_config_uses_router_defaults() {
        let options = Config::parse("{}").unwrap().router_options().unwrap();
        assert_eq!(options.mode, NodeMode::Router);
        assert_eq!(options.listen_addr.port(), 9876);
        assert_eq!(options.control_addr.map(|addr| addr.port()), Some(9877));
        assert_eq!(options.st_lifetime, None);
        assert_eq!(options.receive_timeout, None);
        assert_eq!(options.event_queue_size, 1024);
    }

    #[test]
    fn rendezvous_mode_listens_on_its_own_port() {
        let config = Config::parse(
            r#"{
                // rendezvous point on the default port
                node: { mode: "rendezvous", listen_ip: "127.0.0.1" },
                router: { st_expire_time_secs: 30 },
            }"#,
        )
        .unwrap();
        let options = config.router_options().unwrap();
        assert_eq!(options.mode, NodeMode::Rendezvous);
        assert_eq!(options.listen_addr, "127.0.0.1:9878".parse().unwrap());
        assert!(options.control_addr.is_none());
        assert_eq!(options.st_lifetime, None);
    }

    #[test]
    fn timeouts_are_converted_from_seconds() {
        let config = Config::parse(
            r#"{
                router: { st_expire_time_secs: 60 },
                tcp: { connection_timeout_secs: 3, receive_timeout_secs: 0 },
            }"#,
        )
        .unwrap();
        let options = config.router_options().unwrap();
        assert_eq!(options.st_lifetime, Some(Duration::from_secs(60)));
        assert_eq!(options.connection_timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.receive_timeout, None);
    }

    #[test]
    fn st_expire_time_beyond_the_cap_is_rejected() {
        let config = Config::parse(r#"{ router: { st_expire_time_secs: 100000000 } }"#).unwrap();
        assert!(matches!(
            config.router_options(),
            Err(ConfigError::StExpireTimeTooLong { value: 100_000_000, .. })
        ));

        let at_cap = format!(
            "{{ router: {{ st_expire_time_secs: {} }} }}",
            MAX_ST_LIFETIME.as_secs()
        );
        let options = Config::parse(&at_cap).unwrap().router_options().unwrap();
        assert_eq!(options.st_lifetime, Some(MAX_ST_LIFETIME));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::parse(r#"{ router: { prot: 1 } }"#).is_err());
        assert!(Config::parse(r#"{ node: { mode: "broker" } }"#).is_err());
    }
}
