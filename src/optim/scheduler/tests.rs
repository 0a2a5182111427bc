//! Tests for learning rate schedulers

use super::*;
use crate::optim::{Adam, GradientDescent, Optimizer};
use approx::assert_abs_diff_eq;

#[test]
fn test_cosine_annealing_initial_lr() {
    let scheduler = CosineAnnealingLR::new(1.0, 100, 0.0);
    assert_abs_diff_eq!(scheduler.get_lr(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_cosine_annealing_final_lr() {
    let mut scheduler = CosineAnnealingLR::new(1.0, 100, 0.1);
    for _ in 0..100 {
        scheduler.step();
    }
    assert_abs_diff_eq!(scheduler.get_lr(), 0.1, epsilon = 1e-6);

    // Clamped past the end
    scheduler.step();
    assert_abs_diff_eq!(scheduler.get_lr(), 0.1, epsilon = 1e-6);
}

#[test]
fn test_cosine_annealing_midpoint() {
    let scheduler = CosineAnnealingLR::new(1.0, 100, 0.0).starting_at(50);
    // cos(pi/2) = 0, so lr = lr_max / 2
    assert_abs_diff_eq!(scheduler.get_lr(), 0.5, epsilon = 1e-4);
}

#[test]
fn test_step_decay_halves_after_boundary_step() {
    let mut scheduler = StepDecayLR::new(1.0, 3, 0.5);
    // steps 0, 1, 2 run at the initial rate; the update after step 2 halves it
    let mut seen = Vec::new();
    for _ in 0..7 {
        seen.push(scheduler.get_lr());
        scheduler.step();
    }
    assert_eq!(seen, vec![1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.25]);
}

#[test]
fn test_step_decay_floor() {
    let scheduler = StepDecayLR::new(1.0, 1, 0.5).with_floor(0.2).starting_at(10);
    assert_abs_diff_eq!(scheduler.get_lr(), 0.2, epsilon = 1e-7);
}

#[test]
fn test_step_decay_zero_step_size_is_constant() {
    let scheduler = StepDecayLR::new(0.3, 0, 0.5).starting_at(1000);
    assert_abs_diff_eq!(scheduler.get_lr(), 0.3, epsilon = 1e-7);
}

#[test]
fn test_schedule_from_spec() {
    let spec = ScheduleSpec {
        policy: LrPolicy::Step,
        lr_max: 1e-3,
        lr_min: 1e-5,
        lr_update_step: 10,
        lr_lower_boundary: 4e-4,
    };
    let schedule = LrSchedule::from_spec(&spec, 100, 25);
    assert!(matches!(schedule, LrSchedule::Step(_)));
    assert_eq!(schedule.current_step(), 25);
    // two halvings would give 2.5e-4, floored
    assert_abs_diff_eq!(schedule.get_lr(), 4e-4, epsilon = 1e-9);

    let spec = ScheduleSpec { policy: LrPolicy::Decay, ..spec };
    let mut schedule = LrSchedule::from_spec(&spec, 10, 0);
    for _ in 0..10 {
        schedule.step();
    }
    assert_abs_diff_eq!(schedule.get_lr(), 1e-5, epsilon = 1e-9);
}

#[test]
fn test_schedule_drives_every_optimizer() {
    let spec = ScheduleSpec {
        policy: LrPolicy::Decay,
        ..ScheduleSpec::default()
    };
    let schedule = LrSchedule::from_spec(&spec, 100, 50);
    let mut g = Adam::default_params(1.0);
    let mut d = GradientDescent::new(1.0);
    let mut optimizers: [&mut dyn Optimizer; 2] = [&mut g, &mut d];
    schedule.apply(&mut optimizers);
    assert_eq!(g.lr(), schedule.get_lr());
    assert_eq!(d.lr(), schedule.get_lr());
}
