//! tests/api/subscriptions.rs

use crate::helpers::{assert_is_redirect_to, setup};

#[tokio::test]
async fn subscribe_redirects_back_to_the_landing_page() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test
        .post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;

    // Assert
    assert_is_redirect_to(&response, "/");
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    // Arrange
    let test = setup().await;

    // Act
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;

    // Assert
    assert_eq!(test.saved_emails().await, vec!["ursula_le_guin@gmail.com"]);
}

#[tokio::test]
async fn subscribe_shows_the_confirmation_page() {
    // Arrange
    let test = setup().await;

    // Act
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    let html = test.get_html("/").await;

    // Assert
    assert!(html.contains("Welcome to the"));
    assert!(html.contains("Welcome to TrendAI News!"));
    assert!(!html.contains("<form"));
}

#[tokio::test]
async fn confirmation_page_survives_a_reload() {
    // Arrange
    let test = setup().await;
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    test.get_html("/").await;

    // Act
    let html = test.get_html("/").await;

    // Assert
    assert!(html.contains("Welcome to the"));
}

#[tokio::test]
async fn subscribe_rejects_empty_and_invalid_emails() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        ("email=", "Email Required", "empty email"),
        ("", "Email Required", "missing email field"),
        ("email=notanemail", "Invalid Email", "no at symbol"),
        ("email=ursula%40localhost", "Invalid Email", "no dot in the domain"),
        ("email=ursula%20le%40gmail.com", "Invalid Email", "whitespace"),
    ];

    for (body, expected_title, description) in test_cases {
        // Act
        let response = test.post_subscriptions(body).await;
        assert_is_redirect_to(&response, "/");
        let html = test.get_html("/").await;

        // Assert
        assert!(
            html.contains(expected_title),
            "The page did not show `{}` when the payload was {}.",
            expected_title,
            description
        );
        assert!(
            html.contains("<form"),
            "The form was not shown when the payload was {}.",
            description
        );
    }
    assert!(test.saved_emails().await.is_empty());
}

#[tokio::test]
async fn subscribe_reports_an_email_that_is_already_subscribed() {
    // Arrange
    let test = setup().await;
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    let other = test.other_visitor();

    // Act
    other
        .post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    let html = other.get_html("/").await;

    // Assert
    assert!(html.contains("Already Subscribed"));
    assert!(html.contains("<form"));
    assert_eq!(test.saved_emails().await.len(), 1);
}

#[tokio::test]
async fn confirmed_visitor_cannot_subscribe_a_second_address() {
    // Arrange
    let test = setup().await;
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;

    // Act
    test.post_subscriptions("email=le_guin%40gmail.com").await;

    // Assert
    assert_eq!(test.saved_emails().await, vec!["ursula_le_guin@gmail.com"]);
}

#[tokio::test]
async fn subscribe_fails_if_sth_wrong_with_subscriptions_table() {
    // Arrange
    let test = setup().await;

    // Sabotage the database
    sqlx::query("ALTER TABLE subscriptions DROP COLUMN subscribed_at;")
        .execute(&test.db_pool)
        .await
        .unwrap();

    // Act
    let response = test
        .post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    let html = test.get_html("/").await;

    // Assert
    assert_is_redirect_to(&response, "/");
    assert!(html.contains("Subscription Failed"));
    assert!(html.contains("<form"));
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
        .fetch_one(&test.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn visitor_can_retry_after_a_failure() {
    // Arrange
    let test = setup().await;
    test.post_subscriptions("email=notanemail").await;

    // Act
    test.post_subscriptions("email=ursula_le_guin%40gmail.com")
        .await;
    let html = test.get_html("/").await;

    // Assert
    assert!(html.contains("Welcome to the"));
    assert_eq!(test.saved_emails().await.len(), 1);
}
