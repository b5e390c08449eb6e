//! Driver/server version compatibility rules.
//!
//! A rule reads "if the server is at least `server`, the driver must be at
//! least `client`". Rules are ordered from the newest server baseline down and
//! the first baseline the server meets decides the outcome. Both columns only
//! grow towards the top of the table, so the first matching rule is always the
//! strictest one that applies.

use crate::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityRule {
    pub client: &'static [u64],
    pub server: &'static [u64],
}

impl CompatibilityRule {
    pub const fn new(client: &'static [u64], server: &'static [u64]) -> Self {
        Self { client, server }
    }

    pub fn client(&self) -> Version {
        Version::from_parts(self.client)
    }

    pub fn server(&self) -> Version {
        Version::from_parts(self.server)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityResult {
    Compatible,
    Incompatible {
        required_client: Version,
        server: Version,
    },
    /// Server or driver older than the oldest baseline the table knows.
    Unsupported,
}

impl CompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityResult::Compatible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityTable {
    pub rules: &'static [CompatibilityRule],
    /// Oldest supported driver and server.
    pub client_floor: &'static [u64],
    pub server_floor: &'static [u64],
}

pub const RULES: &[CompatibilityRule] = &[
    CompatibilityRule::new(&[3, 7], &[4, 0]),
    CompatibilityRule::new(&[3, 6], &[3, 6]),
    CompatibilityRule::new(&[3, 4], &[3, 4]),
    CompatibilityRule::new(&[3, 2], &[3, 2]),
    CompatibilityRule::new(&[2, 8], &[3, 0]),
    CompatibilityRule::new(&[2, 7], &[2, 6]),
];

pub const STANDARD: CompatibilityTable = CompatibilityTable {
    rules: RULES,
    client_floor: &[2, 6],
    server_floor: &[2, 6],
};

impl CompatibilityTable {
    pub fn client_floor(&self) -> Version {
        Version::from_parts(self.client_floor)
    }

    pub fn server_floor(&self) -> Version {
        Version::from_parts(self.server_floor)
    }

    pub fn check(&self, client: &Version, server: &Version) -> CompatibilityResult {
        if let Some(rule) = self.rules.iter().find(|rule| *server >= rule.server()) {
            let required = rule.client();
            if *client < required {
                return CompatibilityResult::Incompatible {
                    required_client: required,
                    server: server.clone(),
                };
            }
        }

        if *server < self.server_floor() || *client < self.client_floor() {
            return CompatibilityResult::Unsupported;
        }

        CompatibilityResult::Compatible
    }
}

/// Checks a driver/server pair against the standard table.
pub fn check(client: &Version, server: &Version) -> CompatibilityResult {
    STANDARD.check(client, server)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn incompatible(required: &str, server: &str) -> CompatibilityResult {
        CompatibilityResult::Incompatible {
            required_client: v(required),
            server: v(server),
        }
    }

    #[test]
    fn table_is_descending() {
        for pair in RULES.windows(2) {
            assert!(pair[0].server() > pair[1].server());
            assert!(pair[0].client() > pair[1].client());
        }
    }

    #[test]
    fn newest_servers_need_3_7() {
        for server in ["4.0", "4.0.1", "4.4.29", "7.0.12", "8.0"] {
            assert!(check(&v("3.7"), &v(server)).is_compatible());
            assert!(check(&v("4.8.0"), &v(server)).is_compatible());
            assert_eq!(check(&v("3.6.1"), &v(server)), incompatible("3.7", server));
        }
    }

    #[test]
    fn servers_3_6_need_3_6() {
        for server in ["3.6", "3.6.23", "3.9.9"] {
            assert!(check(&v("3.6"), &v(server)).is_compatible());
            assert!(check(&v("3.10"), &v(server)).is_compatible());
            assert_eq!(check(&v("3.5"), &v(server)), incompatible("3.6", server));
        }
    }

    #[test]
    fn listed_pairs() {
        assert_eq!(check(&v("2.5"), &v("2.5")), CompatibilityResult::Unsupported);
        assert_eq!(check(&v("3.6"), &v("3.6")), CompatibilityResult::Compatible);
        assert_eq!(check(&v("3.5"), &v("3.6")), incompatible("3.6", "3.6"));
        assert_eq!(check(&v("2.8"), &v("3.0")), CompatibilityResult::Compatible);
        assert_eq!(check(&v("2.7"), &v("3.0")), incompatible("2.8", "3.0"));
    }

    #[test]
    fn old_server_or_driver_is_unsupported() {
        assert_eq!(check(&v("3.7"), &v("2.4")), CompatibilityResult::Unsupported);
        // server 2.6 matches the oldest rule before the floor is consulted
        assert_eq!(check(&v("2.5"), &v("2.6")), incompatible("2.7", "2.6"));
    }

    #[test]
    fn incompatible_reports_observed_server() {
        match check(&v("3.0"), &v("4.2.3")) {
            CompatibilityResult::Incompatible {
                required_client,
                server,
            } => {
                assert_eq!(required_client.to_string(), "3.7");
                assert_eq!(server.to_string(), "4.2.3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn idempotent() {
        let (client, server) = (v("3.4"), v("3.6.2"));
        assert_eq!(check(&client, &server), check(&client, &server));
    }

    #[test]
    fn first_match_equals_full_scan() {
        let full_scan = |client: &Version, server: &Version| {
            for rule in RULES {
                if *server >= rule.server() && *client < rule.client() {
                    return incompatible(&rule.client().to_string(), &server.to_string());
                }
            }
            if *server < STANDARD.server_floor() || *client < STANDARD.client_floor() {
                return CompatibilityResult::Unsupported;
            }
            CompatibilityResult::Compatible
        };

        let grid = [
            "2.4", "2.5", "2.6", "2.7", "2.8", "2.9", "3.0", "3.1", "3.2", "3.3", "3.4", "3.5",
            "3.6", "3.6.1", "3.7", "3.9", "3.10", "4.0", "4.4", "6.0",
        ];
        for client in grid {
            for server in grid {
                let (client, server) = (v(client), v(server));
                assert_eq!(
                    check(&client, &server),
                    full_scan(&client, &server),
                    "{client} / {server}"
                );
            }
        }
    }

    #[test]
    fn custom_table() {
        const TABLE: CompatibilityTable = CompatibilityTable {
            rules: &[CompatibilityRule::new(&[2, 0], &[3, 6])],
            client_floor: &[2, 0],
            server_floor: &[3, 6],
        };

        assert!(TABLE.check(&v("3.2.3"), &v("7.0.4")).is_compatible());
        assert_eq!(TABLE.check(&v("1.2"), &v("4.0")), incompatible("2.0", "4.0"));
        assert_eq!(
            TABLE.check(&v("3.2"), &v("3.4")),
            CompatibilityResult::Unsupported
        );
    }
}
