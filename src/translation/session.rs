//! 翻译会话状态
//!
//! 会话持有运行标记和译文记录表。文档树基于 `Rc`，所有操作都在同一线程上，
//! 因此用 `Cell` / `RefCell` 即可，运行标记是唯一的同步手段。

use std::cell::{Cell, Ref, RefCell, RefMut};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::render::Registry;

/// 翻译会话
#[derive(Debug, Default)]
pub struct Session {
    running: Cell<bool>,
    registry: RefCell<Registry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// 标记翻译开始；已有翻译在运行时返回 `Busy`
    ///
    /// 返回的守卫在离开作用域时清除运行标记。
    pub fn try_start(&self) -> TranslationResult<RunningGuard<'_>> {
        if self.running.replace(true) {
            return Err(TranslationError::Busy);
        }

        Ok(RunningGuard { session: self })
    }

    pub fn registry(&self) -> Ref<'_, Registry> {
        self.registry.borrow()
    }

    /// 可变借用记录表，不能跨越 `.await` 持有
    pub fn registry_mut(&self) -> RefMut<'_, Registry> {
        self.registry.borrow_mut()
    }

    /// 当前处于激活状态的译文数量
    pub fn active_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

/// 运行标记守卫
#[derive(Debug)]
pub struct RunningGuard<'a> {
    session: &'a Session,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.session.running.set(false);
    }
}
