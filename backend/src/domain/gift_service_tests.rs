//! Tests for the gift service.

use super::*;
use crate::domain::ports::{MockGiftRepository, MockUserProfileRepository, MockUserRepository};
use crate::domain::{
    Age, ErrorCode, ExternalId, ProfileDraft, Region, SchoolType, SchoolTypeRestriction, User,
    UserRole,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rstest::rstest;

type Service = GiftService<MockGiftRepository, MockUserProfileRepository, MockUserRepository>;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0)
        .single()
        .expect("valid time")
}

fn service(
    gifts: MockGiftRepository,
    profiles: MockUserProfileRepository,
    users: MockUserRepository,
) -> Service {
    GiftService::new(
        Arc::new(gifts),
        Arc::new(profiles),
        Arc::new(users),
        Arc::new(FixedClock(now())),
    )
}

fn gift(id: i64, latitude: f64, longitude: f64) -> Gift {
    Gift {
        id: GiftId::new(id),
        store_name: format!("店舗 {id}"),
        gift_title: "ドリンク無料".into(),
        description: "先着順".into(),
        location: GeoPoint::new(latitude, longitude).expect("valid point"),
        address: None,
        region: Region::default(),
        image_url: None,
        expiry_date: None,
        usage_limit: 1,
        age_restriction: None,
        school_type_restriction: SchoolTypeRestriction::None,
        is_active: true,
    }
}

fn gifts_returning(found: Gift, usage_count: u32) -> MockGiftRepository {
    let mut gifts = MockGiftRepository::new();
    gifts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(found)));
    gifts
        .expect_usage_count()
        .return_once(move |_, _| Ok(usage_count));
    gifts
}

fn profiles_returning(age: Option<i64>, school: Option<SchoolType>) -> MockUserProfileRepository {
    let mut profiles = MockUserProfileRepository::new();
    profiles.expect_find().returning(move |user_id| {
        Ok(Some(
            ProfileDraft {
                age: age.map(|a| Age::new(a).expect("age")),
                school_type: school,
                ..ProfileDraft::default()
            }
            .into_profile(*user_id, now()),
        ))
    });
    profiles
}

#[tokio::test]
async fn redeem_issues_gift_token() {
    let user_id = UserId::random();
    let mut gifts = gifts_returning(gift(3, 35.0, 135.0), 0);
    gifts
        .expect_redeem()
        .withf(move |redemption: &GiftRedemption| {
            redemption.qr_code.as_ref().starts_with(&format!(
                "GIFT-3-{user_id}-{}-",
                now().timestamp_millis()
            ))
        })
        .times(1)
        .returning(|redemption| {
            Ok(GiftUsage {
                id: 11,
                user_id: redemption.user_id,
                gift_id: redemption.gift_id,
                qr_code: redemption.qr_code.clone(),
                used_at: redemption.used_at,
            })
        });

    let usage = service(
        gifts,
        profiles_returning(None, None),
        MockUserRepository::new(),
    )
    .redeem(&user_id, GiftId::new(3))
    .await
    .expect("redeemed");
    assert_eq!(usage.gift_id, GiftId::new(3));
    assert_eq!(usage.used_at, now());
}

#[tokio::test]
async fn redeem_over_limit_is_refused_before_insert() {
    let mut gifts = gifts_returning(gift(3, 35.0, 135.0), 1);
    gifts.expect_redeem().times(0);

    let err = service(
        gifts,
        profiles_returning(None, None),
        MockUserRepository::new(),
    )
    .redeem(&UserId::random(), GiftId::new(3))
    .await
    .expect_err("limit reached");
    assert_eq!(err.code(), ErrorCode::InventoryExhausted);
    assert_eq!(err.details().expect("details")["code"], "usage_limit_reached");
}

#[tokio::test]
async fn redeem_race_on_limit_is_reported() {
    let mut gifts = gifts_returning(gift(3, 35.0, 135.0), 0);
    gifts
        .expect_redeem()
        .return_once(|_| Err(GiftRepositoryError::usage_limit_reached(1_u32, 1_u32)));

    let err = service(
        gifts,
        profiles_returning(None, None),
        MockUserRepository::new(),
    )
    .redeem(&UserId::random(), GiftId::new(3))
    .await
    .expect_err("lost the race");
    assert_eq!(err.code(), ErrorCode::InventoryExhausted);
}

#[rstest]
#[case(Some(16), None, "age_restriction")]
#[case(None, None, "age_restriction")]
#[case(Some(25), Some(SchoolType::Working), "school_type_restriction")]
#[tokio::test]
async fn redeem_enforces_profile_restrictions(
    #[case] age: Option<i64>,
    #[case] school: Option<SchoolType>,
    #[case] reason: &str,
) {
    let mut restricted = gift(4, 35.0, 135.0);
    restricted.age_restriction = Some(Age::new(18).expect("age"));
    restricted.school_type_restriction = SchoolTypeRestriction::University;
    let mut gifts = gifts_returning(restricted, 0);
    gifts.expect_redeem().times(0);

    let err = service(
        gifts,
        profiles_returning(age, school),
        MockUserRepository::new(),
    )
    .redeem(&UserId::random(), GiftId::new(4))
    .await
    .expect_err("restricted");
    assert_eq!(err.code(), ErrorCode::RestrictionViolation);
    assert_eq!(err.details().expect("details")["code"], reason);
}

#[tokio::test]
async fn redeem_without_profile_fails_age_restriction() {
    let mut restricted = gift(4, 35.0, 135.0);
    restricted.age_restriction = Some(Age::new(20).expect("age"));
    let gifts = gifts_returning(restricted, 0);
    let mut profiles = MockUserProfileRepository::new();
    profiles.expect_find().return_once(|_| Ok(None));

    let err = service(gifts, profiles, MockUserRepository::new())
        .redeem(&UserId::random(), GiftId::new(4))
        .await
        .expect_err("no profile");
    assert_eq!(err.code(), ErrorCode::RestrictionViolation);
}

#[tokio::test]
async fn redeem_expired_gift_is_refused() {
    let mut expired = gift(5, 35.0, 135.0);
    expired.expiry_date = Some(now() - Duration::hours(1));
    let gifts = gifts_returning(expired, 0);

    let err = service(
        gifts,
        profiles_returning(None, None),
        MockUserRepository::new(),
    )
    .redeem(&UserId::random(), GiftId::new(5))
    .await
    .expect_err("expired");
    assert_eq!(err.details().expect("details")["code"], "expired");
}

#[tokio::test]
async fn redeem_unknown_gift_is_not_found() {
    let mut gifts = MockGiftRepository::new();
    gifts.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(
        gifts,
        MockUserProfileRepository::new(),
        MockUserRepository::new(),
    )
    .redeem(&UserId::random(), GiftId::new(404))
    .await
    .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn usage_summary_reports_allowance() {
    let mut limited = gift(6, 35.0, 135.0);
    limited.usage_limit = 3;
    let gifts = gifts_returning(limited, 2);

    let summary = service(
        gifts,
        MockUserProfileRepository::new(),
        MockUserRepository::new(),
    )
    .usage(&UserId::random(), GiftId::new(6))
    .await
    .expect("summary");
    assert_eq!(summary, GiftUsageSummary::new(2, 3));
    assert!(summary.can_use);
}

#[tokio::test]
async fn nearby_ranks_active_gifts() {
    let mut gifts = MockGiftRepository::new();
    gifts.expect_all_active().return_once(|| {
        Ok(vec![
            gift(1, 34.6937, 135.5023),
            gift(2, 35.6895, 139.6917),
            gift(3, 35.4437, 139.6380),
        ])
    });

    let origin = GeoPoint::new(35.6762, 139.6503).expect("tokyo");
    let ranked = service(
        gifts,
        MockUserProfileRepository::new(),
        MockUserRepository::new(),
    )
    .nearby(origin, 2)
    .await
    .expect("ranked");

    let ids: Vec<_> = ranked.iter().map(|r| r.item.id.get()).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[rstest]
#[case(0)]
#[case(101)]
#[tokio::test]
async fn nearby_rejects_limit_out_of_range(#[case] limit: usize) {
    let mut gifts = MockGiftRepository::new();
    gifts.expect_all_active().times(0);

    let origin = GeoPoint::new(35.0, 135.0).expect("valid");
    let err = service(
        gifts,
        MockUserProfileRepository::new(),
        MockUserRepository::new(),
    )
    .nearby(origin, limit)
    .await
    .expect_err("bad limit");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn only_admins_create_gifts() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| {
        Ok(Some(User {
            id: *id,
            external_id: ExternalId::new("test|planner").expect("valid id"),
            name: None,
            email: None,
            login_method: None,
            role: UserRole::Planner,
            last_signed_in: now(),
        }))
    });
    let mut gifts = MockGiftRepository::new();
    gifts.expect_insert().times(0);

    let draft = GiftDraft {
        store_name: "書店".into(),
        gift_title: "栞プレゼント".into(),
        description: "来店特典".into(),
        latitude: 35.0,
        longitude: 135.0,
        ..GiftDraft::default()
    };
    let err = service(gifts, MockUserProfileRepository::new(), users)
        .create(&UserId::random(), draft)
        .await
        .expect_err("planner cannot create gifts");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
