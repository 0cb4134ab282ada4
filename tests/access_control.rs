//! Access control tests: rank precedence, visibility, and the console gate

mod helpers;

use helpers::TestHarness;
use nslogger::models::Rank;

#[tokio::test]
async fn rank_is_none_without_a_record() {
    let h = TestHarness::new().await;
    assert_eq!(h.ctx.auth.rank("ghost").await.unwrap(), Rank::None);
}

#[tokio::test]
async fn role_tables_take_precedence_over_stored_rank() {
    let h = TestHarness::new().await;
    h.register_plain("alice", 100).await;

    assert_eq!(h.ctx.auth.rank("alice").await.unwrap(), Rank::User);

    h.ctx.db.roles.add_global_admin("alice").await.unwrap();
    assert_eq!(h.ctx.auth.rank("alice").await.unwrap(), Rank::Gadmin);

    // The operator set wins over everything else.
    h.ctx.db.roles.add_operator("alice").await.unwrap();
    assert_eq!(h.ctx.auth.rank("alice").await.unwrap(), Rank::Operator);
}

#[tokio::test]
async fn stored_ladmin_rank_is_honored() {
    let h = TestHarness::new().await;
    h.register_plain("bob", 200).await;
    h.ctx.db.users.set_rank("bob", Rank::Ladmin).await.unwrap();

    assert_eq!(h.ctx.auth.rank("bob").await.unwrap(), Rank::Ladmin);
    assert!(h.ctx.auth.is_allowed("bob", 200).await.unwrap());
}

#[tokio::test]
async fn elevated_ranks_see_every_bot() {
    let h = TestHarness::new().await;
    h.grant_operator("opA", 1).await;
    h.ctx.db.bots.add_bot("alpha", "a.log", "opA").await.unwrap();
    h.ctx.db.bots.add_bot("beta", "b.log", "opA").await.unwrap();

    h.register_plain("gosha", 300).await;
    h.ctx.db.roles.add_global_admin("gosha").await.unwrap();

    // Visibility matches the full bot list regardless of admin sets.
    let visible = h.ctx.auth.visible_bots("gosha").await.unwrap();
    assert_eq!(visible, vec!["alpha".to_string(), "beta".to_string()]);
    let visible = h.ctx.auth.visible_bots("opA").await.unwrap();
    assert_eq!(visible, vec!["alpha".to_string(), "beta".to_string()]);
}

#[tokio::test]
async fn local_admin_sees_only_their_bots() {
    let h = TestHarness::new().await;
    h.grant_operator("opA", 1).await;
    h.ctx.db.bots.add_bot("alpha", "a.log", "opA").await.unwrap();
    h.ctx.db.bots.add_bot("beta", "b.log", "opA").await.unwrap();

    h.register_plain("lena", 400).await;
    h.ctx.db.bots.add_admin("beta", "lena").await.unwrap();

    assert_eq!(h.ctx.auth.visible_bots("lena").await.unwrap(), vec!["beta".to_string()]);
    assert!(h.ctx.auth.can_view("lena", "beta").await.unwrap());
    assert!(!h.ctx.auth.can_view("lena", "alpha").await.unwrap());
}

#[tokio::test]
async fn gate_rejects_empty_unknown_banned_and_plain_users() {
    let h = TestHarness::new().await;

    assert!(!h.ctx.auth.is_allowed("", 1).await.unwrap());
    assert!(!h.ctx.auth.is_allowed("ghost", 2).await.unwrap());

    h.register_plain("plain", 3).await;
    assert!(!h.ctx.auth.is_allowed("plain", 3).await.unwrap());

    h.register_plain("banned", 4).await;
    h.ctx.db.users.set_rank("banned", Rank::Gadmin).await.unwrap();
    h.ctx.db.users.set_ban_status("banned", true).await.unwrap();
    assert!(!h.ctx.auth.is_allowed("banned", 4).await.unwrap());
}

#[tokio::test]
async fn gate_checks_stored_rank_not_derived_rank() {
    let h = TestHarness::new().await;

    // Membership in the global-admin set elevates the effective rank and
    // visibility, but the gate still reads the stored rank field.
    h.register_plain("setonly", 5).await;
    h.ctx.db.roles.add_global_admin("setonly").await.unwrap();

    assert_eq!(h.ctx.auth.rank("setonly").await.unwrap(), Rank::Gadmin);
    assert!(!h.ctx.auth.is_allowed("setonly", 5).await.unwrap());

    // The same holds for bot-scoped membership.
    h.grant_operator("opA", 1).await;
    h.ctx.db.bots.add_bot("alpha", "a.log", "opA").await.unwrap();
    h.register_plain("member", 6).await;
    h.ctx.db.bots.add_admin("alpha", "member").await.unwrap();

    assert_eq!(h.ctx.auth.visible_bots("member").await.unwrap(), vec!["alpha".to_string()]);
    assert!(!h.ctx.auth.is_allowed("member", 6).await.unwrap());
}

#[tokio::test]
async fn managers_are_gadmin_or_higher() {
    let h = TestHarness::new().await;
    h.grant_operator("opA", 1).await;
    assert!(h.ctx.auth.can_manage("opA").await.unwrap());

    h.register_plain("lena", 2).await;
    h.ctx.db.users.set_rank("lena", Rank::Ladmin).await.unwrap();
    assert!(!h.ctx.auth.can_manage("lena").await.unwrap());
}
