//! 单条记录的转换步骤
//!
//! 批处理器只依赖 `Transform`，具体做什么（模拟确认、真实业务、测试桩）由调用方注入

use crate::error::ProcessError;
use futures::future::BoxFuture;
use std::future::Future;

/// 转换步骤返回的 future
pub type TransformFuture<T> = BoxFuture<'static, Result<T, ProcessError>>;

/// 对单条记录的异步转换，每条记录可以独立失败
pub trait Transform<T>: Send + Sync + 'static {
    fn apply(&self, item: T) -> TransformFuture<T>;
}

/// 把异步闭包包装成 `Transform`
pub struct FnTransform<F> {
    f: F,
}

/// 由闭包构造转换步骤
///
/// ```ignore
/// let transform = transform_fn(|item: Appointment| async move { Ok(item) });
/// ```
pub fn transform_fn<T, F, Fut>(f: F) -> FnTransform<F>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<T, ProcessError>>,
{
    FnTransform { f }
}

impl<T, F, Fut> Transform<T> for FnTransform<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ProcessError>> + Send + 'static,
{
    fn apply(&self, item: T) -> TransformFuture<T> {
        Box::pin((self.f)(item))
    }
}
