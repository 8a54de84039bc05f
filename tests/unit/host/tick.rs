use super::*;
use crate::host::channel::face_channel;

#[test]
fn armed_token_is_posted_after_delay() {
    let (handle, queue) = face_channel();
    let mut driver = ThreadTickDriver::new(handle);
    driver.arm(TimerToken(7), Duration::from_millis(5)).unwrap();

    let event = queue.next_timeout(Duration::from_secs(5));
    assert!(matches!(event, Some(FaceEvent::Tick(TimerToken(7)))));
}

#[test]
fn disarmed_token_is_never_posted() {
    let (handle, queue) = face_channel();
    let mut driver = ThreadTickDriver::new(handle);
    driver.arm(TimerToken(1), Duration::from_millis(50)).unwrap();
    driver.disarm(TimerToken(1));
    driver.disarm(TimerToken(1));

    assert!(queue.next_timeout(Duration::from_millis(300)).is_none());
}

#[test]
fn finished_sleepers_are_pruned() {
    let (handle, queue) = face_channel();
    let mut driver = ThreadTickDriver::new(handle);
    driver.arm(TimerToken(1), Duration::ZERO).unwrap();
    assert!(queue.next_timeout(Duration::from_secs(5)).is_some());

    // The sleeper may still be unwinding right after posting.
    for _ in 0..100 {
        if driver.in_flight() == 0 {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(driver.in_flight(), 0);
    driver.arm(TimerToken(2), Duration::from_secs(60)).unwrap();
    assert_eq!(driver.cancels.len(), 1);
}
