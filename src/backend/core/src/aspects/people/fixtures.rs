//! Demo accounts. Other aspects' fixtures refer to these ids.

use chrono::Duration;

use super::entity::{User, UserProfile};
use crate::rbac::Role;
use crate::store::iso;

pub const ADMIN_ID: &str = "6f1c2b1e-2f0a-4c55-9d7e-6b0f3d9a1e01";
pub const MAKER_ID: &str = "6f1c2b1e-2f0a-4c55-9d7e-6b0f3d9a1e02";
pub const HUNTER_ID: &str = "6f1c2b1e-2f0a-4c55-9d7e-6b0f3d9a1e03";

pub fn users() -> Vec<User> {
    let now = iso::now();
    [
        (ADMIN_ID, "ada", "Ada Admin", vec![Role::Admin, Role::Member], 30),
        (MAKER_ID, "mo", "Mo Maker", vec![Role::Member], 20),
        (HUNTER_ID, "hana", "Hana Hunter", vec![Role::Moderator, Role::Member], 10),
    ]
    .into_iter()
    .map(|(id, username, display_name, roles, days_ago)| {
        let created_at = now - Duration::days(days_ago);
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{}@launchpad.test", username),
            display_name: display_name.to_string(),
            roles,
            created_at,
            updated_at: created_at,
        }
    })
    .collect()
}

pub fn profiles() -> Vec<UserProfile> {
    let now = iso::now();
    [
        (ADMIN_ID, "Ada Admin", "Keeps the lights on", "Berlin"),
        (MAKER_ID, "Mo Maker", "Builds developer tools", "Lisbon"),
        (HUNTER_ID, "Hana Hunter", "Finds the next big thing", "Osaka"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (user_id, display_name, headline, location))| {
        let created_at = now - Duration::days(9 - i as i64);
        UserProfile {
            id: String::new(),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            headline: Some(headline.to_string()),
            bio: None,
            avatar_url: None,
            website_url: None,
            location: Some(location.to_string()),
            created_at,
            updated_at: created_at,
        }
    })
    .collect()
}
