mod tests {
    use copilot_light_core::{
        Action, BrightnessLevel, ControlRequest, Mode, QueueFull, RequestQueue,
    };

    #[test]
    fn test_drain_is_fifo_and_empties_queue() {
        let queue = RequestQueue::<4>::new();
        queue
            .push(ControlRequest::Perform(Action::Enter(Mode::Static)))
            .unwrap();
        queue
            .push(ControlRequest::SelectLevel(BrightnessLevel::Fixed(1)))
            .unwrap();
        assert_eq!(queue.len(), 2);

        let mut drained = Vec::new();
        queue.drain(|request| drained.push(request));
        assert_eq!(
            drained,
            [
                ControlRequest::Perform(Action::Enter(Mode::Static)),
                ControlRequest::SelectLevel(BrightnessLevel::Fixed(1)),
            ]
        );
        assert!(queue.is_empty());

        queue.drain(|_| panic!("queue should be empty"));
    }

    #[test]
    fn test_push_during_drain_waits_for_next_drain() {
        let queue = RequestQueue::<2>::new();
        queue.push(ControlRequest::Perform(Action::Nothing)).unwrap();

        let mut handled = 0;
        queue.drain(|_| {
            handled += 1;
            queue
                .push(ControlRequest::Perform(Action::ToggleBrightness))
                .unwrap();
        });
        assert_eq!(handled, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_full_queue_returns_request() {
        let queue = RequestQueue::<1>::new();
        let request = ControlRequest::Perform(Action::ToggleBrightness);

        queue.push(request).unwrap();
        assert_eq!(queue.push(request), Err(QueueFull(request)));
        assert_eq!(queue.len(), 1);
    }
}
