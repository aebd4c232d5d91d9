use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    /// 当前线程上正在执行的被织入方法（栈顶为最内层）
    static FRAMES: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// 最内层被织入方法的名称
pub fn current() -> Option<&'static str> {
    FRAMES.with(|frames| frames.borrow().last().copied())
}

/// 当前线程的织入深度
pub fn depth() -> usize {
    FRAMES.with(|frames| frames.borrow().len())
}

/// 方法帧守卫，创建时入栈，析构时出栈（panic 展开时同样出栈）
///
/// 绑定在线程上，不能跨线程移动
pub struct FrameGuard {
    _not_send: PhantomData<*const ()>,
}

impl FrameGuard {
    pub fn enter(name: &'static str) -> Self {
        FRAMES.with(|frames| frames.borrow_mut().push(name));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}
