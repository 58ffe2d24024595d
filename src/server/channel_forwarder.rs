use actix::{Actor, ActorContext, Context, Handler, Message};
use tokio::sync::mpsc::UnboundedSender;

/// Hands actor notifications to a websocket task. Stops once the socket side
/// is gone; it also stops on its own when the actor feeding it stops and
/// drops its recipient.
pub struct ChannelForwarder<M> {
    tx: UnboundedSender<M>,
}

impl<M> ChannelForwarder<M> {
    pub fn new(tx: UnboundedSender<M>) -> Self {
        Self { tx }
    }
}

impl<M> Actor for ChannelForwarder<M>
where
    M: Message<Result = ()> + Send + 'static,
{
    type Context = Context<Self>;
}

impl<M> Handler<M> for ChannelForwarder<M>
where
    M: Message<Result = ()> + Send + 'static,
{
    type Result = ();

    fn handle(&mut self, msg: M, ctx: &mut Self::Context) -> Self::Result {
        if self.tx.send(msg).is_err() {
            ctx.stop();
        }
    }
}
