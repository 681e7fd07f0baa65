//! Profile identifier parsing.

use personagen::content::{username_from_input, ProfileError};

#[test]
fn accepts_common_profile_forms() {
    for input in [
        "alice",
        "  alice  ",
        "u/alice",
        "/u/alice/",
        "https://www.reddit.com/user/alice",
        "https://www.reddit.com/user/alice/",
        "https://www.reddit.com/user/alice/?utm_source=share",
        "https://old.reddit.com/u/alice#top",
    ] {
        assert_eq!(
            username_from_input(input).as_deref(),
            Ok("alice"),
            "input: {input:?}"
        );
    }
}

#[test]
fn keeps_underscores_and_hyphens() {
    assert_eq!(
        username_from_input("Some_User-42").as_deref(),
        Ok("Some_User-42")
    );
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(username_from_input(""), Err(ProfileError::Empty(_))));
    assert!(matches!(username_from_input(" / "), Err(ProfileError::Empty(_))));
}

#[test]
fn unsafe_characters_are_rejected() {
    for input in ["al ice", "alice.html", "..", "ali$ce"] {
        assert!(
            matches!(
                username_from_input(input),
                Err(ProfileError::InvalidUsername(_))
            ),
            "input: {input:?}"
        );
    }
}
