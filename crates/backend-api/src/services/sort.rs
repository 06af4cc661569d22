use roster_database::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    #[default]
    Name,
}

impl SortKey {
    /// Parse a `sortBy` parameter; an absent or empty value selects the default.
    /// Returns `None` for anything other than `id` or `name`.
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("") => Some(Self::default()),
            Some("id") => Some(Self::Id),
            Some("name") => Some(Self::Name),
            Some(_) => None,
        }
    }

    fn value<'a>(&self, user: &'a User) -> &'a str {
        match self {
            SortKey::Id => &user.id,
            SortKey::Name => &user.name,
        }
    }
}

/// Stable, case-insensitive ascending sort.
pub fn sort_users(users: &mut [User], key: SortKey) {
    users.sort_by_key(|user| key.value(user).to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> User {
        User::new(id, name, format!("{id}@example.com"))
    }

    #[test]
    fn parses_known_keys_and_default() {
        assert_eq!(SortKey::from_param(None), Some(SortKey::Name));
        assert_eq!(SortKey::from_param(Some("")), Some(SortKey::Name));
        assert_eq!(SortKey::from_param(Some("id")), Some(SortKey::Id));
        assert_eq!(SortKey::from_param(Some("name")), Some(SortKey::Name));
        assert_eq!(SortKey::from_param(Some("email")), None);
        assert_eq!(SortKey::from_param(Some("Name")), None);
    }

    #[test]
    fn ignores_case_when_comparing() {
        let mut users = vec![user("1", "bob"), user("2", "Alice"), user("3", "carol")];
        sort_users(&mut users, SortKey::Name);
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Alice", "bob", "carol"]);
    }

    #[test]
    fn keeps_equal_keys_in_fetch_order() {
        let mut users = vec![user("b", "ada"), user("a", "ADA"), user("c", "Ada")];
        sort_users(&mut users, SortKey::Name);
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn sorts_by_id() {
        let mut users = vec![user("U2", "x"), user("u1", "y"), user("u3", "z")];
        sort_users(&mut users, SortKey::Id);
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u1", "U2", "u3"]);
    }
}
