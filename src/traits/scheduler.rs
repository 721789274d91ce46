/// "Run the loop again at the next display refresh"
///
/// There is no guaranteed interval between a request and the frame it
/// produces. The host asks `take_pending` before each tick.
pub trait FrameScheduler {
    /// Ask for one more frame; repeated requests before it fires coalesce
    fn request_frame(&mut self);

    /// Drop the outstanding request, if any
    fn cancel_frame(&mut self);

    /// Consume the outstanding request, returning whether there was one
    fn take_pending(&mut self) -> bool;
}
