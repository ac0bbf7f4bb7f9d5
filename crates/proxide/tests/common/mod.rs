// Common test utilities for integration tests
//
// Shared interfaces, a recording handler and a target implementing every
// interface.

#![allow(dead_code)]

use proxide::{Handler, Invocation, Result, Value, interface};
use std::fmt::Display;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

interface! {
    /// Mixed-arity interface.
    pub trait IFoo {
        fn foo(&self);
        fn bar(&self, one: String, two: String);
        fn baz(&self, value: i32) -> i32;
    }
}

interface! {
    pub trait IOne {
        fn one(&self) -> String;
    }
}

interface! {
    pub trait ITwo {
        fn two(&self, n: u32) -> u32;
    }
}

interface! {
    pub trait IConvert {
        fn convert<U: Display>(&self, value: U) -> String;
        fn echo<U>(&self, value: U) -> U;
    }
}

interface! {
    pub trait IPingA {
        fn ping(&self) -> bool;
    }
}

interface! {
    pub trait IPingB {
        fn ping(&self) -> bool;
    }
}

/// One recorded call: `Interface::method` and its arguments.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub arguments: Vec<Value>,
}

/// Handler recording every invocation and answering with a fixed value.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Recorded>>,
    answer: Option<Value>,
}

impl Recorder {
    pub fn answering(value: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer: Some(value),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

impl Handler for Recorder {
    fn handle(&self, invocation: &Invocation) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(Recorded {
            method: invocation.method().to_string(),
            arguments: invocation.arguments().to_vec(),
        });
        Ok(self.answer.clone())
    }
}

impl Handler for &'static Recorder {
    fn handle(&self, invocation: &Invocation) -> Result<Option<Value>> {
        (**self).handle(invocation)
    }
}

/// Leaks a recorder so tests can inspect it after handing it to a proxy.
pub fn leaked_recorder(answer: Option<Value>) -> &'static Recorder {
    Box::leak(Box::new(match answer {
        Some(value) => Recorder::answering(value),
        None => Recorder::default(),
    }))
}

/// Target implementing every test interface.
#[derive(Default)]
pub struct Calculator {
    pub seen: Mutex<Vec<i32>>,
    pub calls: AtomicUsize,
}

impl Calculator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl IFoo for Calculator {
    fn foo(&self) -> Result<()> {
        self.hit();
        Ok(())
    }

    fn bar(&self, _one: String, _two: String) -> Result<()> {
        self.hit();
        Ok(())
    }

    fn baz(&self, value: i32) -> Result<i32> {
        self.hit();
        self.seen.lock().unwrap().push(value);
        Ok(value * 2)
    }
}

impl IOne for Calculator {
    fn one(&self) -> Result<String> {
        self.hit();
        Ok("one".to_string())
    }
}

impl ITwo for Calculator {
    fn two(&self, n: u32) -> Result<u32> {
        self.hit();
        Ok(n + 2)
    }
}

impl IConvert for Calculator {
    fn convert<U: proxide::ValueType + Display>(&self, value: U) -> Result<String> {
        self.hit();
        Ok(format!("<{value}>"))
    }

    fn echo<U: proxide::ValueType>(&self, value: U) -> Result<U> {
        self.hit();
        Ok(value)
    }
}

/// Collects the string arguments of a recorded call.
pub fn strings(recorded: &Recorded) -> Vec<String> {
    recorded
        .arguments
        .iter()
        .filter_map(|value| value.cast::<String>())
        .collect()
}
