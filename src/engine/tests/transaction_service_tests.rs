use std::str::FromStr;

use assert2::let_assert;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::account::AccountStore;
use crate::account::AccountStyle;
use crate::account::Pin;
use crate::account::SharedAccount;
use crate::account::Username;
use crate::engine::Operation;
use crate::engine::RejectReason;
use crate::engine::Settlement;
use crate::engine::TransactionError;
use crate::engine::TransactionService;
use crate::ledger::balance_of;
use crate::ledger::summary_of;
use crate::scheduler::EventLoop;
use crate::session::IdleTick;
use crate::session::SessionError;
use crate::session::SessionManager;
use crate::session::SessionState;

const SETTLEMENT_DELAY: u64 = 2;

#[derive(Debug)]
enum TestTask {
    Idle,
    Settle(Settlement),
}

impl From<IdleTick> for TestTask {
    fn from(_: IdleTick) -> Self {
        Self::Idle
    }
}

impl From<Settlement> for TestTask {
    fn from(settlement: Settlement) -> Self {
        Self::Settle(settlement)
    }
}

#[test]
fn transfer_above_balance_is_rejected_without_mutation() {
    let (service, store, mut events) = setup(&["50"], &["300"]);
    let sender = find(&store, "js");

    let res = service.transfer(&store, &sender, &Username::from("jd"), Some(dec("100")), &mut events);

    let_assert!(
        Err(TransactionError::Rejected {
            operation: Operation::Transfer,
            reason: RejectReason::InsufficientFunds { balance, amount }
        }) = res
    );
    assert_eq!(dec("50"), balance);
    assert_eq!(dec("100"), amount);
    assert_eq!(0, events.pending());
    assert_eq!(vec![dec("50")], find(&store, "js").borrow().movements());
    assert_eq!(vec![dec("300")], find(&store, "jd").borrow().movements());
}

#[rstest]
#[case("jd", None, RejectReason::NonPositiveAmount)]
#[case("jd", Some("0"), RejectReason::NonPositiveAmount)]
#[case("jd", Some("-5"), RejectReason::NonPositiveAmount)]
#[case("zz", Some("10"), RejectReason::UnknownRecipient(Username::from("zz")))]
#[case("js", Some("10"), RejectReason::SelfTransfer)]
fn transfer_with_unmet_preconditions_is_rejected(
    #[case] to: &str,
    #[case] amount: Option<&str>,
    #[case] expected: RejectReason,
) {
    let (service, store, mut events) = setup(&["500"], &["300"]);
    let sender = find(&store, "js");

    let res = service.transfer(&store, &sender, &Username::from(to), amount.map(dec), &mut events);

    assert_eq!(
        Err(TransactionError::Rejected {
            operation: Operation::Transfer,
            reason: expected,
        }),
        res
    );
    assert_eq!(0, events.pending());
}

#[test]
fn transfer_is_recorded_only_once_the_settlement_delay_elapsed() {
    let (service, store, mut events) = setup(&["500"], &["300"]);
    let sender = find(&store, "js");

    assert!(
        service
            .transfer(&store, &sender, &Username::from("jd"), Some(dec("120")), &mut events)
            .is_ok()
    );

    settle_until(&service, &mut events, SETTLEMENT_DELAY - 1);
    assert_eq!(vec![dec("500")], sender.borrow().movements());
    assert_eq!(dec("500"), balance_of(&sender.borrow()));

    settle_until(&service, &mut events, SETTLEMENT_DELAY);
    let sender = sender.borrow();
    let recipient = find(&store, "jd");
    let recipient = recipient.borrow();
    assert_eq!(vec![dec("500"), dec("-120")], sender.movements());
    assert_eq!(vec![dec("300"), dec("120")], recipient.movements());
    assert_eq!(Some(&settled_at()), sender.movement_dates().last());
    assert_eq!(Some(&settled_at()), recipient.movement_dates().last());
    assert_eq!(sender.movements().len(), sender.movement_dates().len());
    assert_eq!(recipient.movements().len(), recipient.movement_dates().len());
}

#[test]
fn transfer_of_the_whole_balance_is_accepted() {
    let (service, store, mut events) = setup(&["100", "-40"], &["300"]);
    let sender = find(&store, "js");

    assert!(
        service
            .transfer(&store, &sender, &Username::from("jd"), Some(dec("60")), &mut events)
            .is_ok()
    );
    settle_until(&service, &mut events, SETTLEMENT_DELAY);

    assert_eq!(Decimal::ZERO, balance_of(&sender.borrow()));
}

#[rstest]
#[case("2000", Some(dec("200")))]
#[case("500", None)]
#[case("1000", None)]
#[case("1000.99", None)]
#[case("1010", Some(dec("101")))]
fn grant_loan_needs_a_single_movement_of_a_tenth_of_the_amount(
    #[case] amount: &str,
    #[case] rejected_threshold: Option<Decimal>,
) {
    let (service, store, mut events) = setup(&["100"], &["300"]);
    let account = find(&store, "js");

    let res = service.grant_loan(&account, Some(dec(amount)), &mut events);

    match rejected_threshold {
        Some(threshold) => assert_eq!(
            Err(TransactionError::Rejected {
                operation: Operation::Loan,
                reason: RejectReason::NoQualifyingMovement { threshold },
            }),
            res
        ),
        None => assert!(res.is_ok(), "res={res:?}"),
    }
}

#[test]
fn grant_loan_checks_single_movements_not_their_total() {
    let (service, store, mut events) = setup(&["60", "60"], &["300"]);
    let account = find(&store, "js");

    assert!(service.grant_loan(&account, Some(dec("1000")), &mut events).is_err());
    assert_eq!(0, events.pending());
}

#[test]
fn grant_loan_records_the_floored_amount_after_the_delay() {
    let (service, store, mut events) = setup(&["100"], &["300"]);
    let account = find(&store, "js");

    assert!(service.grant_loan(&account, Some(dec("499.9")), &mut events).is_ok());
    settle_until(&service, &mut events, SETTLEMENT_DELAY - 1);
    assert_eq!(vec![dec("100")], account.borrow().movements());

    settle_until(&service, &mut events, SETTLEMENT_DELAY);
    assert_eq!(vec![dec("100"), dec("499")], account.borrow().movements());
    assert_eq!(Some(&settled_at()), account.borrow().movement_dates().last());
}

#[test]
fn repeated_eligible_loans_stop_before_the_ledger_overflows() {
    let (service, store, mut events) = setup(&["25000"], &["300"]);
    let account = find(&store, "js");

    let mut granted = 0;
    let rejection = loop {
        assert!(granted < 64, "loans never rejected, granted={granted}");
        let largest = account.borrow().movements().iter().copied().max().unwrap();
        let amount = largest.checked_mul(Decimal::TEN).unwrap_or(Decimal::MAX);

        match service.grant_loan(&account, Some(amount), &mut events) {
            Ok(_) => granted += 1,
            Err(error) => break error,
        }
        let until = events.now() + SETTLEMENT_DELAY;
        settle_until(&service, &mut events, until);
        let _ = balance_of(&account.borrow());
        let _ = summary_of(&account.borrow());
    };

    let_assert!(
        TransactionError::Rejected {
            operation: Operation::Loan,
            reason: RejectReason::LedgerOverflow { .. }
        } = rejection
    );
    assert_eq!(granted + 1, account.borrow().movements().len());
    assert_eq!(0, events.pending());
}

#[test]
fn transfer_overflowing_the_recipient_ledger_is_rejected() {
    let (service, store, mut events) = setup(&["100"], &["79228162514264337593543950335"]);
    let sender = find(&store, "js");

    assert_eq!(
        Err(TransactionError::Rejected {
            operation: Operation::Transfer,
            reason: RejectReason::LedgerOverflow {
                account: Username::from("jd"),
                amount: dec("1"),
            },
        }),
        service.transfer(&store, &sender, &Username::from("jd"), Some(dec("1")), &mut events)
    );
    assert_eq!(0, events.pending());
}

#[rstest]
#[case(None)]
#[case(Some("0.9"))]
#[case(Some("-100"))]
fn grant_loan_below_one_unit_is_rejected(#[case] amount: Option<&str>) {
    let (service, store, mut events) = setup(&["100"], &["300"]);
    let account = find(&store, "js");

    assert_eq!(
        Err(TransactionError::Rejected {
            operation: Operation::Loan,
            reason: RejectReason::NonPositiveAmount,
        }),
        service.grant_loan(&account, amount.map(dec), &mut events)
    );
}

#[test]
fn settlements_due_together_are_recorded_in_acceptance_order() {
    let (service, store, mut events) = setup(&["1000"], &["300"]);
    let account = find(&store, "js");

    service.grant_loan(&account, Some(dec("50")), &mut events).unwrap();
    service
        .transfer(&store, &account, &Username::from("jd"), Some(dec("30")), &mut events)
        .unwrap();
    settle_until(&service, &mut events, SETTLEMENT_DELAY);

    assert_eq!(vec![dec("1000"), dec("50"), dec("-30")], account.borrow().movements());
}

#[test]
fn close_account_removes_the_active_account_and_ends_the_session() {
    let (service, mut store, mut events) = setup(&["100"], &["300"]);
    let mut session = SessionManager::new(300);
    session
        .login(&store, &Username::from("js"), Some(Pin(1111)), &mut events)
        .unwrap();

    let_assert!(
        Ok(closed) = service.close_account(&mut store, &mut session, &Username::from("js"), Some(Pin(1111)), &mut events)
    );

    assert_eq!(&Username::from("js"), closed.borrow().username());
    assert_eq!(SessionState::LoggedOut, session.state());
    assert!(store.find_by_username(&Username::from("js")).is_none());
    assert!(
        session
            .login(&store, &Username::from("js"), Some(Pin(1111)), &mut events)
            .is_err()
    );
}

#[rstest]
#[case("js", Some(Pin(2222)))]
#[case("js", None)]
#[case("jd", Some(Pin(2222)))]
fn close_account_with_mismatching_credentials_is_a_no_op(#[case] username: &str, #[case] pin: Option<Pin>) {
    let (service, mut store, mut events) = setup(&["100"], &["300"]);
    let mut session = SessionManager::new(300);
    session
        .login(&store, &Username::from("js"), Some(Pin(1111)), &mut events)
        .unwrap();

    let res = service.close_account(&mut store, &mut session, &Username::from(username), pin, &mut events);

    let_assert!(Err(SessionError::InvalidCredentials { .. }) = res);
    assert_eq!(2, store.len());
    assert_eq!(SessionState::LoggedIn, session.state());
}

#[test]
fn close_account_without_a_session_is_rejected() {
    let (service, mut store, mut events) = setup(&["100"], &["300"]);
    let mut session = SessionManager::new(300);

    assert!(
        service
            .close_account(&mut store, &mut session, &Username::from("js"), Some(Pin(1111)), &mut events)
            .is_err()
    );
    assert_eq!(2, store.len());
}

#[test]
fn pending_settlement_still_applies_to_a_closed_account() {
    let (service, mut store, mut events) = setup(&["100"], &["300"]);
    let mut session = SessionManager::new(300);
    let account = session
        .login(&store, &Username::from("js"), Some(Pin(1111)), &mut events)
        .unwrap();

    service.grant_loan(&account, Some(dec("500")), &mut events).unwrap();
    service
        .close_account(&mut store, &mut session, &Username::from("js"), Some(Pin(1111)), &mut events)
        .unwrap();
    settle_until(&service, &mut events, SETTLEMENT_DELAY);

    assert_eq!(vec![dec("100"), dec("500")], account.borrow().movements());
    assert!(store.find_by_username(&Username::from("js")).is_none());
}

#[test]
fn settlement_displays_its_parties() {
    let (_, store, _) = setup(&["100"], &["300"]);
    let settlement = Settlement::Transfer {
        from: find(&store, "js"),
        to: find(&store, "jd"),
        amount: dec("12.5"),
    };

    insta::assert_snapshot!(settlement.to_string(), @"settlement=(transfer from=js to=jd amount=12.5)");
}

fn settle_until(service: &TransactionService, events: &mut EventLoop<TestTask>, until: u64) {
    while let Some((_, task)) = events.pop_due(until) {
        if let TestTask::Settle(settlement) = task {
            service.settle(&settlement, settled_at());
        }
    }
}

fn setup(js_movements: &[&str], jd_movements: &[&str]) -> (TransactionService, AccountStore, EventLoop<TestTask>) {
    let store = AccountStore::new(vec![
        account("Jonas Schmedtmann", Pin(1111), js_movements),
        account("Jessica Davis", Pin(2222), jd_movements),
    ]);
    (TransactionService::new(SETTLEMENT_DELAY), store, EventLoop::new())
}

fn account(owner: &str, pin: Pin, movements: &[&str]) -> Account {
    let date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    Account::new(
        owner,
        pin,
        Decimal::ONE,
        AccountStyle {
            currency: "EUR".to_owned(),
            locale: "pl-PL".to_owned(),
        },
        movements.iter().map(|mov| (dec(mov), date)),
    )
}

fn find(store: &AccountStore, username: &str) -> SharedAccount {
    store.find_by_username(&Username::from(username)).unwrap()
}

fn settled_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}
