use crate::model::user::{User, UserCredential};

/// Static user directory loaded once from configuration.
pub struct UserDirectory {
    users: Vec<UserCredential>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    /// Plaintext comparison against the directory.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        self.users
            .iter()
            .find(|c| c.user.username == username && c.password == password)
            .map(|c| c.user.clone())
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .map(|c| &c.user)
            .find(|u| u.username == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture::Fixture;
    use crate::model::role::Role;

    fn directory() -> UserDirectory {
        UserDirectory::new(Fixture::builtin().unwrap().users)
    }

    #[test]
    fn every_table_entry_authenticates_with_its_role() {
        let dir = directory();
        for (username, password, role) in [
            ("admin", "password123", Role::Admin),
            ("empleado1", "emp123", Role::Employee),
            ("supervisor", "super456", Role::Supervisor),
        ] {
            let user = dir.authenticate(username, password).unwrap();
            assert_eq!(user.username, username);
            assert_eq!(user.role, role);
        }
    }

    #[test]
    fn wrong_password_or_swapped_pair_is_rejected() {
        let dir = directory();
        assert!(dir.authenticate("admin", "emp123").is_none());
        assert!(dir.authenticate("admin", "PASSWORD123").is_none());
        assert!(dir.authenticate("nobody", "password123").is_none());
    }

    #[test]
    fn find_by_username() {
        let dir = directory();
        assert_eq!(dir.find("empleado1").unwrap().display_name, "Empleado Demo");
        assert!(dir.find("ghost").is_none());
    }
}
