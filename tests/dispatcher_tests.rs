//! End-to-end tests of command routing against in-memory fakes


use bottender::bot::command_handlers::{NO_DRINKS_FOUND, RANDOM_INTRO, RECIPE_ADDED, RECIPE_ADD_FAILED};
use bottender::bot::{ConversationId, InboundMessage};
use bottender::commands::help_text;
use test_helpers::*;

const MARTINI_CARD: &str = "Name: Martini\n\
                            Author: @fixture\n\
                            Mixing: stirred\n\
                            Glass: coupe\n\
                            Serving: up\n\
                            Ingredients:\n \
                            2.00 oz Gin\n \
                            1.00 oz Dry Vermouth\n \
                            3 dashes Orange Bitters\n \
                            1 Lemon Twist\n\
                            Notes:\n ";

fn bot_with_martini() -> TestBot {
    let store = stocked_store();
    let martini = drink(
        "Martini",
        "stirred",
        vec![
            item(&store, "Orange Bitters", 3),
            item(&store, "Lemon Twist", 1),
            item(&store, "Dry Vermouth", 100),
            item(&store, "Gin", 200),
        ],
    );
    store.insert_drink(martini);
    TestBot::with_store(store)
}

#[tokio::test]
async fn test_describe_renders_full_card() {
    let bot = bot_with_martini();
    bot.say("alice", "!bottender describe Martini").await;

    assert_eq!(bot.transport.replies(), vec![MARTINI_CARD.to_string()]);
    assert!(bot.transport.broadcasts().is_empty());
}

#[tokio::test]
async fn test_describe_joins_multi_word_query() {
    let store = stocked_store();
    let gimlet = drink("Elder Gimlet", "shaken", vec![item(&store, "Gin", 200)]);
    store.insert_drink(gimlet);
    let bot = TestBot::with_store(store);

    bot.say("alice", "!bottender describe   Elder   Gimlet").await;

    let replies = bot.transport.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("Name: Elder Gimlet\n"));
}

#[tokio::test]
async fn test_describe_unknown_drink() {
    let bot = bot_with_martini();
    bot.say("alice", "!bottender describe Negroni").await;
    assert_eq!(bot.transport.replies(), vec![NO_DRINKS_FOUND.to_string()]);
}

#[tokio::test]
async fn test_describe_without_query() {
    let bot = bot_with_martini();
    bot.say("alice", "!bottender describe").await;
    assert_eq!(
        bot.transport.replies(),
        vec!["must specify a drink query".to_string()]
    );
}

#[tokio::test]
async fn test_describe_treats_incomplete_row_as_missing() {
    let store = stocked_store();
    let half_entered = drink("Mystery", "", vec![item(&store, "Gin", 100)]);
    store.insert_drink(half_entered);
    let bot = TestBot::with_store(store);

    bot.say("alice", "!bottender describe Mystery").await;
    assert_eq!(bot.transport.replies(), vec![NO_DRINKS_FOUND.to_string()]);
}

#[tokio::test]
async fn test_describe_store_failure_is_only_logged() {
    let bot = bot_with_martini();
    *bot.store.fail_reads.lock() = true;

    bot.say("alice", "!bottender describe Martini").await;
    assert!(bot.transport.sent().is_empty());
}

#[tokio::test]
async fn test_random_without_matches() {
    let bot = bot_with_martini();
    bot.say("alice", "!bottender random absinthe").await;
    assert_eq!(bot.transport.replies(), vec![NO_DRINKS_FOUND.to_string()]);
}

#[tokio::test]
async fn test_random_filter_is_case_insensitive_substring() {
    let store = stocked_store();
    let spritz = drink(
        "Hugo",
        "built",
        vec![item(&store, "Elderflower Liqueur", 100)],
    );
    let gimlet = drink("Gimlet", "shaken", vec![item(&store, "Lime Juice", 75)]);
    store.insert_drink(spritz);
    store.insert_drink(gimlet);
    let bot = TestBot::with_store(store);

    bot.say("alice", "!bottender random ELDER").await;

    assert_eq!(
        bot.transport.replies(),
        vec![RANDOM_INTRO.to_string(), "/flip Hugo".to_string()]
    );
}

#[tokio::test]
async fn test_random_lists_names_for_flip() {
    let store = stocked_store();
    for name in ["Martini", "Gibson", "Vesper"] {
        let d = drink(name, "stirred", vec![item(&store, "Gin", 200)]);
        store.insert_drink(d);
    }
    let bot = TestBot::with_store(store);

    bot.say("alice", "!bottender random gin").await;

    assert_eq!(
        bot.transport.replies(),
        vec![
            RANDOM_INTRO.to_string(),
            "/flip Martini, Gibson, Vesper".to_string()
        ]
    );
}

#[tokio::test]
async fn test_random_respects_sample_size() {
    let store = stocked_store();
    for i in 0..15 {
        let d = drink(&format!("Gin Drink {}", i), "stirred", vec![item(&store, "Gin", 200)]);
        store.insert_drink(d);
    }
    let bot = TestBot::with_store(store);

    bot.say("alice", "!bottender random").await;

    let replies = bot.transport.replies();
    assert_eq!(replies.len(), 2);
    let names = replies[1].trim_start_matches("/flip ").split(", ").count();
    assert_eq!(names, 10);
}

#[tokio::test]
async fn test_add_recipe_end_to_end() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Dry Vermouth,30" --ingredient "Gin,150" --ingredient "Orange Bitters,3" --ingredient "Lemon Twist,1" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec![
            RECIPE_ADDED.to_string(),
            "!bottender describe Martini".to_string()
        ]
    );
    assert_eq!(
        bot.transport.broadcasts(),
        vec![
            "New recipe added by @mixologist: Martini!".to_string(),
            "!bottender describe Martini".to_string()
        ]
    );

    let stored = bot.store.drinks();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].author, "mixologist");
    assert_eq!(stored[0].ingredients.len(), 4);

    // The announced command works
    bot.say("someone", "!bottender describe Martini").await;
    let card = bot.transport.replies().pop().unwrap();
    assert!(card.starts_with("Name: Martini\nAuthor: @mixologist\n"));
    assert!(card.contains(
        "\n 1.50 oz Gin\n 0.30 oz Dry Vermouth\n 3 dashes Orange Bitters\n 1 Lemon Twist\n"
    ));
}

#[tokio::test]
async fn test_add_recipe_with_curly_quotes_and_notes() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        "!bottender addrecipe --ingredient \u{201C}Elderflower Liqueur,50\u{201D} --mixing built --glass wine --serving \u{201C}over ice\u{201D} --notes \u{201C}top with soda\u{201D} \u{201C}Elder Spritz\u{201D}",
    )
    .await;

    let stored = bot.store.drinks();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Elder Spritz");
    assert_eq!(stored[0].serving, "over ice");
    assert_eq!(stored[0].notes, "top with soda");
}

#[tokio::test]
async fn test_add_recipe_reports_missing_fields() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,200" --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec!["must specify all aspects of drink, missing: mixing, glass".to_string()]
    );
    assert_eq!(bot.store.drink_count(), 0);
}

#[tokio::test]
async fn test_add_recipe_requires_exactly_one_name() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        "!bottender addrecipe --mixing stirred --glass coupe --serving up Dry Martini",
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec!["must specify a drink name".to_string()]
    );
}

#[tokio::test]
async fn test_add_recipe_without_arguments() {
    let bot = TestBot::with_store(stocked_store());
    bot.say("mixologist", "!bottender addrecipe").await;
    assert_eq!(
        bot.transport.replies(),
        vec!["must specify drink ingredients".to_string()]
    );
}

#[tokio::test]
async fn test_add_recipe_bad_ingredient_amount() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,lots" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec!["invalid ingredient amount: lots".to_string()]
    );
    assert_eq!(bot.store.drink_count(), 0);
}

#[tokio::test]
async fn test_add_recipe_unknown_ingredient_writes_nothing() {
    let bot = TestBot::with_store(stocked_store());

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,200" --ingredient "Unicorn Tears,10" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec!["failed to describe ingredient: Unicorn Tears".to_string()]
    );
    assert!(bot.transport.broadcasts().is_empty());
    assert_eq!(bot.store.drink_count(), 0);
}

#[tokio::test]
async fn test_add_recipe_ingredient_lookup_error() {
    let bot = TestBot::with_store(stocked_store());
    *bot.store.fail_ingredient_lookup.lock() = true;

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,200" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec!["failed to describe ingredient: Gin".to_string()]
    );
    assert_eq!(bot.store.drink_count(), 0);
}

#[tokio::test]
async fn test_add_recipe_store_failure() {
    let bot = TestBot::with_store(stocked_store());
    *bot.store.fail_writes.lock() = true;

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,200" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    assert_eq!(
        bot.transport.replies(),
        vec![RECIPE_ADD_FAILED.to_string()]
    );
    assert!(bot.transport.broadcasts().is_empty());
}

#[tokio::test]
async fn test_send_failures_are_independent() {
    let bot = TestBot::with_store(stocked_store());
    bot.transport
        .failing_texts
        .lock()
        .push(RECIPE_ADDED.to_string());
    *bot.transport.fail_broadcasts.lock() = true;

    bot.say(
        "mixologist",
        r#"!bottender addrecipe --ingredient "Gin,200" --mixing stirred --glass coupe --serving up Martini"#,
    )
    .await;

    // The drink is stored and the remaining reply still goes out
    assert_eq!(bot.store.drink_count(), 1);
    assert_eq!(
        bot.transport.replies(),
        vec!["!bottender describe Martini".to_string()]
    );
    assert!(bot.transport.broadcasts().is_empty());

    // Later commands are unaffected
    bot.say("alice", "!bottender describe Martini").await;
    assert_eq!(bot.transport.replies().len(), 2);
}

#[tokio::test]
async fn test_help_lists_commands() {
    let bot = TestBot::new();
    bot.say("alice", "!bottender help").await;

    let replies = bot.transport.replies();
    assert_eq!(replies, vec![help_text(PREFIX)]);
    assert!(replies[0].contains("!bottender describe"));
    assert!(replies[0].contains("!bottender random"));
    assert!(replies[0].contains("!bottender addrecipe"));
}

#[tokio::test]
async fn test_unrelated_messages_are_ignored() {
    let bot = bot_with_martini();

    bot.say("alice", "anyone up for drinks?").await;
    bot.say("alice", "!bottender").await;
    bot.say("alice", "!bottender pour Martini").await;
    bot.say("alice", "!bartender describe Martini").await;
    bot.dispatcher
        .dispatch(&InboundMessage {
            conversation: ConversationId(7),
            sender: "alice".to_string(),
            text: None,
        })
        .await;

    assert!(bot.transport.sent().is_empty());
}

#[tokio::test]
async fn test_replies_go_to_the_originating_conversation() {
    let bot = bot_with_martini();
    bot.dispatcher
        .dispatch(&InboundMessage {
            conversation: ConversationId(99),
            sender: "bob".to_string(),
            text: Some("!bottender describe Negroni".to_string()),
        })
        .await;

    assert_eq!(
        bot.transport.sent(),
        vec![Sent::Conversation(ConversationId(99), NO_DRINKS_FOUND.to_string())]
    );
}
