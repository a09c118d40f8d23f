//! Shared command channel behavior: ordering, polling, and exchange
//! serialization across concurrent callers.

use camlink::link::codec::LinkFrame;
use camlink::link::{ChannelId, Link};
use edge_executor::LocalExecutor;
use futures_lite::future::block_on;

#[test]
fn words_arrive_in_fifo_order() {
    let link = Link::new();
    block_on(async {
        let controller = link.controller(ChannelId::System);
        let agent = link.agent(ChannelId::System);

        for word in [7u32, 8, 9] {
            controller.send_value(word).await;
        }
        for expected in [7u32, 8, 9] {
            assert_eq!(agent.wait_value().await, expected);
        }
    });
}

#[test]
fn try_value_is_nonblocking() {
    let link = Link::new();
    block_on(async {
        let controller = link.controller(ChannelId::Camera);
        let agent = link.agent(ChannelId::Camera);

        assert_eq!(controller.try_value(), None);
        agent.send_value(42).await;
        assert_eq!(controller.try_value(), Some(42));
        assert_eq!(controller.try_value(), None);
    });
}

#[test]
fn payload_frames_cross_untouched() {
    let link = Link::new();
    block_on(async {
        use camlink::link::codec::{RegCommand, RegOp};

        let controller = link.controller(ChannelId::Camera);
        let agent = link.agent(ChannelId::Camera);

        let cmd = RegCommand {
            op: RegOp::ReadI2c,
            device: 1,
            reg: 0x0018,
            value: 0,
        };
        controller.send_data(&cmd).await.unwrap();

        match agent.wait_frame().await {
            LinkFrame::Data(bytes) => {
                assert_eq!(camlink::link::codec::decode_reg_command(&bytes), Ok(cmd));
            }
            LinkFrame::Value(_) => panic!("expected payload frame"),
        }
    });
}

#[test]
fn concurrent_exchanges_never_interleave() {
    let link = Link::new();
    let ex: LocalExecutor = LocalExecutor::default();

    // Echo responder: answers each request word with word + 1000.
    let _responder = ex.spawn(async {
        let ep = link.agent(ChannelId::Camera);
        loop {
            if let LinkFrame::Value(word) = ep.wait_frame().await {
                ep.send_value(word + 1000).await;
            }
        }
    });

    // Two callers hammer the same channel; the exchange mutex must
    // keep every request paired with its own response.
    let caller_a = ex.spawn(async {
        let ep = link.controller(ChannelId::Camera);
        for word in 0u32..20 {
            assert_eq!(ep.exchange_value(word).await, word + 1000);
        }
    });
    let caller_b = ex.spawn(async {
        let ep = link.controller(ChannelId::Camera);
        for word in 100u32..120 {
            assert_eq!(ep.exchange_value(word).await, word + 1000);
        }
    });

    block_on(ex.run(async {
        caller_a.await;
        caller_b.await;
    }));
}

#[test]
fn channels_do_not_crosstalk() {
    let link = Link::new();
    let ex: LocalExecutor = LocalExecutor::default();

    let _responder = ex.spawn(async {
        let ep = link.agent(ChannelId::Camera);
        loop {
            if let LinkFrame::Value(word) = ep.wait_frame().await {
                ep.send_value(word + 1).await;
            }
        }
    });

    block_on(ex.run(async {
        // Park a word on an unrelated channel first.
        link.controller(ChannelId::Sound).send_value(0xAAAA).await;

        let camera = link.controller(ChannelId::Camera);
        assert_eq!(camera.exchange_value(5).await, 6);

        // The parked word is still waiting, untouched by the exchange.
        assert_eq!(link.agent(ChannelId::Sound).wait_value().await, 0xAAAA);
    }));
}
